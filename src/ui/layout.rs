use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalyzerLayout {
    pub header: Rect,
    pub input: Rect,
    pub output: Rect,
    pub footer: Rect,
}

/// Status line on top, key hints at the bottom, the two editors side by side.
pub fn split_analyzer_layout(area: Rect) -> AnalyzerLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    AnalyzerLayout {
        header: rows[0],
        input: panes[0],
        output: panes[1],
        footer: rows[2],
    }
}

/// Columns available for text inside the bordered output pane.
pub fn output_text_width(area: Rect) -> usize {
    usize::from(split_analyzer_layout(area).output.width.saturating_sub(2)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_panes_side_by_side() {
        let area = Rect::new(0, 0, 80, 20);
        let layout = split_analyzer_layout(area);

        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.height, 1);
        assert_eq!(layout.footer.y, 19);
        assert_eq!(layout.input.height, 18);
        assert_eq!(layout.output.height, 18);
        assert_eq!(layout.input.width, 40);
        assert_eq!(layout.output.width, 40);
        assert_eq!(layout.output.x, 40);
    }

    #[test]
    fn test_output_text_width_excludes_borders() {
        assert_eq!(output_text_width(Rect::new(0, 0, 80, 20)), 38);
        assert_eq!(output_text_width(Rect::new(0, 0, 2, 4)), 1);
    }

    #[test]
    fn test_layout_survives_tiny_terminal() {
        let layout = split_analyzer_layout(Rect::new(0, 0, 10, 4));
        assert_eq!(layout.header.height, 1);
        assert!(layout.input.height <= 3);
    }
}
