mod controller;
mod outcome;

pub use controller::RequestController;
pub use outcome::{AnalysisError, AnalysisOutcome};
