use crate::analysis::AnalysisOutcome;
use crate::reveal::RevealEvent;

/// Results produced off the UI loop and applied on it, in arrival order.
#[derive(Debug)]
pub enum UiUpdate {
    AnalysisFinished(AnalysisOutcome),
    /// The submit produced no outcome: it was ignored as a duplicate, it
    /// panicked, or its task was cancelled.
    AnalysisAborted,
    Reveal(RevealEvent),
}
