use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "You are an expert code analyzer. Analyze the given code, \
resolve code smells, eliminate duplications, improve code quality, and ensure it follows best practices.";

pub const USER_PROMPT_PREFIX: &str = "Analyze the following code. If there are errors, correct them. \
If it's correct, enhance it by optimizing or improving readability:\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// The fixed two-message prompt asking the model to review `draft`.
    pub fn for_draft(model: &str, draft: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!("{USER_PROMPT_PREFIX}{draft}")),
            ],
        }
    }
}

/// The part of a chat completion body we rely on. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

impl ChatCompletion {
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
    }
}
