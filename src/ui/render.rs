use crate::app::AnalyzerMode;
use crate::state::{OutputKind, OutputView, INPUT_PLACEHOLDER};
use crate::ui::input_metrics::{
    char_display_width, cursor_row_col, truncate_to_display_width, wrap_input_lines,
};
use crate::ui::layout::split_analyzer_layout;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const INPUT_TITLE: &str = " Analyze Your Code Here ";
const OUTPUT_TITLE: &str = " Reviewed/Optimized Code ";

/// Draws the whole analyzer screen for `mode`.
pub fn render_analyzer(frame: &mut Frame<'_>, mode: &AnalyzerMode) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    let layout = split_analyzer_layout(area);
    let state = mode.state();

    render_status_line(frame, layout.header, &mode.status_line());
    render_input(
        frame,
        layout.input,
        state.editor.buffer(),
        state.editor.cursor(),
    );
    render_output(frame, layout.output, &state.output_view(), state.output_scroll());
    render_key_hints(frame, layout.footer, mode.analyze_label());
}

pub fn render_input(frame: &mut Frame<'_>, area: Rect, input: &str, cursor_byte: usize) {
    if area.height <= 2 || area.width <= 2 {
        return;
    }
    let block = Block::default().borders(Borders::ALL).title(INPUT_TITLE);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if input.is_empty() {
        frame.render_widget(
            Paragraph::new(INPUT_PLACEHOLDER).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        frame.set_cursor_position((inner.x, inner.y));
        return;
    }

    let input_width = inner.width.max(1) as usize;
    let lines = wrap_input_lines(input, input_width);
    let (cursor_row, cursor_col) = cursor_row_col(input, cursor_byte, input_width);
    let visible_rows = inner.height as usize;
    let window_start = cursor_row.saturating_add(1).saturating_sub(visible_rows);

    let rendered: Vec<Line> = lines
        .into_iter()
        .skip(window_start)
        .take(visible_rows)
        .map(Line::from)
        .collect();
    frame.render_widget(
        Paragraph::new(rendered).style(Style::default().fg(Color::Gray)),
        inner,
    );

    let cursor_y = inner
        .y
        .saturating_add(cursor_row.saturating_sub(window_start) as u16);
    let cursor_x = inner
        .x
        .saturating_add(cursor_col as u16)
        .min(inner.x.saturating_add(inner.width.saturating_sub(1)));
    frame.set_cursor_position((cursor_x, cursor_y));
}

pub fn render_output(frame: &mut Frame<'_>, area: Rect, view: &OutputView<'_>, scroll: usize) {
    if area.height <= 2 || area.width <= 2 {
        return;
    }
    let block = Block::default().borders(Borders::ALL).title(OUTPUT_TITLE);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = match view.kind {
        OutputKind::Placeholder => Style::default().fg(Color::DarkGray),
        OutputKind::Revealed => Style::default().fg(Color::White),
        OutputKind::Notice => Style::default().fg(Color::Yellow),
    };
    let rows = wrap_input_lines(view.text, inner.width as usize);
    let scroll = scroll.min(rows.len().saturating_sub(1));
    let rendered: Vec<Line> = rows
        .into_iter()
        .skip(scroll)
        .take(inner.height as usize)
        .map(Line::from)
        .collect();
    frame.render_widget(Paragraph::new(rendered).style(style), inner);
}

pub fn render_status_line(frame: &mut Frame<'_>, area: Rect, status: &str) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let text = truncate_line(&format!("Code Analyzer  {status}"), area.width as usize);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

pub fn render_key_hints(frame: &mut Frame<'_>, area: Rect, analyze_label: &str) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let key = Style::default()
        .fg(Color::Black)
        .bg(Color::Gray)
        .add_modifier(Modifier::BOLD);
    let spans = vec![
        Span::styled(" ^S ", key),
        Span::raw(format!(" {analyze_label}  ")),
        Span::styled(" ^R ", key),
        Span::raw(" Reset Input  "),
        Span::styled(" ^L ", key),
        Span::raw(" Clear Output  "),
        Span::styled(" ^Z/^Y ", key),
        Span::raw(" Undo/Redo  "),
        Span::styled(" PgUp/PgDn ", key),
        Span::raw(" Scroll  "),
        Span::styled(" Esc ", key),
        Span::raw(" Quit"),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn truncate_line(input: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::new();
    let mut used = 0usize;
    let mut truncated = false;

    for ch in input.chars() {
        let ch_width = char_display_width(ch);
        if used + ch_width > width {
            truncated = true;
            break;
        }
        out.push(ch);
        used += ch_width;
    }

    if truncated && width >= 4 {
        out = truncate_to_display_width(&out, width - 3);
        out.push_str("...");
    }
    out
}
