use crate::analysis::RequestController;
use crate::api::ApiClient;
use crate::config::Config;
use crate::reveal::RevealPhase;
use crate::runtime::context::RuntimeContext;
use crate::runtime::frontend::UserInputEvent;
use crate::runtime::mode::RuntimeMode;
use crate::runtime::r#loop::Runtime;
use crate::runtime::UiUpdate;
use crate::state::AnalyzerState;
use crate::ui::editor::InputAction;
use crate::ui::input_metrics::wrap_input_lines;
use crate::ui::layout::output_text_width;
use crate::util::word_count;
use anyhow::Result;
use crossterm::event::Event;
use crossterm::terminal::size as terminal_size;
use ratatui::layout::Rect;
use std::sync::Arc;
use tokio::sync::mpsc;

const FALLBACK_VIEWPORT: (u16, u16) = (80, 24);

/// The analyzer screen: draft editor on the left, reviewed code on the right.
pub struct AnalyzerMode {
    state: AnalyzerState,
    analyzing: bool,
    reveal_phase: RevealPhase,
    quit_requested: bool,
}

impl Default for AnalyzerMode {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerMode {
    pub fn new() -> Self {
        Self {
            state: AnalyzerState::new(),
            analyzing: false,
            reveal_phase: RevealPhase::Idle,
            quit_requested: false,
        }
    }

    pub fn state(&self) -> &AnalyzerState {
        &self.state
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal_phase
    }

    pub fn status_line(&self) -> String {
        format!(
            "mode:{} reveal:{} result:{}w",
            if self.analyzing { "analyzing" } else { "ready" },
            self.reveal_phase.label(),
            word_count(self.state.result_text())
        )
    }

    pub fn analyze_label(&self) -> &'static str {
        if self.analyzing {
            "Analyzing..."
        } else {
            "Analyze"
        }
    }

    /// Last row the output pane can scroll to when the screen is `viewport`,
    /// counting soft-wrapped rows the way the pane renders them.
    pub fn output_scroll_limit(&self, viewport: Rect) -> usize {
        wrap_input_lines(self.state.output_view().text, output_text_width(viewport))
            .len()
            .saturating_sub(1)
    }

    fn submit(&mut self, ctx: &mut RuntimeContext) {
        if self.analyzing {
            return;
        }
        self.analyzing = true;
        ctx.dispatch_analysis(self.state.draft().to_string());
    }

    fn reset_output(&mut self, ctx: &mut RuntimeContext) {
        ctx.cancel_reveal();
        self.state.reset_output();
        self.reveal_phase = ctx.reveal_phase();
    }

    fn handle_action(&mut self, action: InputAction, ctx: &mut RuntimeContext) {
        match action {
            InputAction::None => {}
            InputAction::Analyze => self.submit(ctx),
            InputAction::ResetInput => self.state.reset_input(),
            InputAction::ResetOutput => self.reset_output(ctx),
            InputAction::ScrollOutput(delta) => {
                let (cols, rows) = terminal_size().unwrap_or(FALLBACK_VIEWPORT);
                let max = self.output_scroll_limit(Rect::new(0, 0, cols, rows));
                self.state.scroll_output(delta, max);
            }
            InputAction::Quit => {
                ctx.cancel_reveal();
                self.quit_requested = true;
            }
        }
    }
}

impl RuntimeMode for AnalyzerMode {
    fn on_frontend_event(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext) {
        let action = match event {
            UserInputEvent::Key(key) => self.state.editor.apply_event(Event::Key(key)),
            UserInputEvent::Paste(text) => self.state.editor.apply_event(Event::Paste(text)),
        };
        self.handle_action(action, ctx);
    }

    fn on_model_update(&mut self, update: UiUpdate, ctx: &mut RuntimeContext) {
        match update {
            UiUpdate::AnalysisFinished(outcome) => {
                self.analyzing = false;
                ctx.cancel_reveal();
                if let Some(text) = self.state.apply_outcome(&outcome) {
                    let handle = ctx.start_reveal(text);
                    self.state.begin_reveal(handle.generation());
                }
            }
            UiUpdate::AnalysisAborted => {
                self.analyzing = false;
            }
            UiUpdate::Reveal(event) => {
                if !self.state.apply_reveal_event(event) {
                    return;
                }
            }
        }
        self.reveal_phase = ctx.reveal_phase();
    }

    fn is_request_in_progress(&self) -> bool {
        self.analyzing
    }

    fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

pub fn build_runtime(config: &Config) -> Result<(Runtime<AnalyzerMode>, RuntimeContext)> {
    let client = ApiClient::new(config)?;
    Ok(build_runtime_with_client(client, config))
}

pub fn build_runtime_with_client(
    client: ApiClient,
    config: &Config,
) -> (Runtime<AnalyzerMode>, RuntimeContext) {
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let controller = Arc::new(RequestController::new(client));
    let ctx = RuntimeContext::new(controller, config.reveal_interval, update_tx);
    (Runtime::new(AnalyzerMode::new(), update_rx), ctx)
}
