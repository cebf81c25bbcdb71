use crate::mistral::MistralError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("empty response: {0}")]
    EmptyResponse(String),

    #[error("{0}")]
    Mistral(#[from] MistralError),

    #[error("http client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[cfg(feature = "fe-local")]
    #[error("fastembed error: {0}")]
    Fastembed(String),
}
