mod analyzer;

pub use analyzer::{AnalyzerState, OutputKind, OutputView, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
