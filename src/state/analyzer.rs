use crate::analysis::AnalysisOutcome;
use crate::reveal::RevealEvent;
use crate::ui::editor::InputEditor;

pub const INPUT_PLACEHOLDER: &str = "Enter your code here...";
pub const OUTPUT_PLACEHOLDER: &str = "The analyzed/enhanced code will appear here...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Placeholder,
    Revealed,
    Notice,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputView<'a> {
    pub text: &'a str,
    pub kind: OutputKind,
}

/// Everything the analyzer screen shows, owned by the UI layer.
///
/// Revealed Text only ever takes frames from the generation recorded by
/// [`AnalyzerState::begin_reveal`], so it is always a word prefix of the
/// Result Text it was started from.
#[derive(Default)]
pub struct AnalyzerState {
    pub editor: InputEditor,
    result_text: String,
    revealed_text: String,
    reveal_generation: Option<u64>,
    output_scroll: usize,
}

impl AnalyzerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        self.editor.buffer()
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    pub fn revealed_text(&self) -> &str {
        &self.revealed_text
    }

    pub fn reveal_generation(&self) -> Option<u64> {
        self.reveal_generation
    }

    pub fn output_scroll(&self) -> usize {
        self.output_scroll
    }

    /// Records a finished attempt. Returns the text to reveal, if any.
    ///
    /// Revealed Text restarts from empty either way; the caller is expected to
    /// cancel whatever reveal is running before starting the next one.
    pub fn apply_outcome(&mut self, outcome: &AnalysisOutcome) -> Option<String> {
        self.result_text = outcome.result_text();
        self.revealed_text.clear();
        self.reveal_generation = None;
        self.output_scroll = 0;
        outcome.reveal_text().map(str::to_string)
    }

    pub fn begin_reveal(&mut self, generation: u64) {
        self.revealed_text.clear();
        self.reveal_generation = Some(generation);
    }

    /// Applies a reveal event. Events from any other generation are dropped.
    /// Returns true when the event belonged to the current reveal.
    pub fn apply_reveal_event(&mut self, event: RevealEvent) -> bool {
        if self.reveal_generation != Some(event.generation()) {
            return false;
        }
        if let RevealEvent::Frame { text, .. } = event {
            self.revealed_text = text;
        }
        true
    }

    pub fn reset_input(&mut self) {
        self.editor.clear();
    }

    pub fn reset_output(&mut self) {
        self.result_text.clear();
        self.revealed_text.clear();
        self.reveal_generation = None;
        self.output_scroll = 0;
    }

    pub fn scroll_output(&mut self, delta: isize, max: usize) {
        let current = self.output_scroll as isize;
        self.output_scroll = current.saturating_add(delta).clamp(0, max as isize) as usize;
    }

    /// What the output pane should display right now.
    pub fn output_view(&self) -> OutputView<'_> {
        if self.reveal_generation.is_some() {
            OutputView {
                text: &self.revealed_text,
                kind: OutputKind::Revealed,
            }
        } else if !self.result_text.is_empty() {
            OutputView {
                text: &self.result_text,
                kind: OutputKind::Notice,
            }
        } else {
            OutputView {
                text: OUTPUT_PLACEHOLDER,
                kind: OutputKind::Placeholder,
            }
        }
    }
}
