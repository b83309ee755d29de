use std::error::Error as StdError;
use thiserror::Error;

/// Why an analysis attempt produced no reviewed code.
///
/// `Display` is the exact text shown to the user in place of a result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Please enter some code to analyze or enhance.")]
    EmptyInput,
    #[error("Error: {status} - {status_text}")]
    HttpStatus { status: u16, status_text: String },
    #[error("Unexpected response structure from the API.")]
    MalformedResponse,
    #[error("An error occurred while analyzing the code.")]
    Request(#[source] Box<dyn StdError + Send + Sync>),
}

impl AnalysisError {
    pub fn request(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Request(error.into())
    }
}

#[derive(Debug)]
pub enum AnalysisOutcome {
    Analyzed(String),
    Failed(AnalysisError),
}

impl AnalysisOutcome {
    /// The Result Text for this attempt.
    pub fn result_text(&self) -> String {
        match self {
            Self::Analyzed(content) => content.clone(),
            Self::Failed(error) => error.to_string(),
        }
    }

    /// Text to animate. Only successful analyses are revealed word by word.
    pub fn reveal_text(&self) -> Option<&str> {
        match self {
            Self::Analyzed(content) => Some(content),
            Self::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Analyzed(_))
    }
}

impl From<Result<String, AnalysisError>> for AnalysisOutcome {
    fn from(result: Result<String, AnalysisError>) -> Self {
        match result {
            Ok(content) => Self::Analyzed(content),
            Err(error) => Self::Failed(error),
        }
    }
}
