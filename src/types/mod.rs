pub mod api;

pub use api::{ChatCompletion, ChatMessage, ChatRequest, Choice, ChoiceMessage};
