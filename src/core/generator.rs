use crate::error::DocQaError;

/// Sampling parameters of a completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionParams {
    /// Low temperature for focused answers.
    pub const ANSWER: Self = Self {
        temperature: 0.1,
        max_tokens: 1000,
    };

    pub const SUMMARY: Self = Self {
        temperature: 0.3,
        max_tokens: 200,
    };
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,

    /// The model that generated the completion, as reported by the provider.
    pub model: String,
}

/// Text generation with a hosted language model.
#[async_trait::async_trait]
pub trait Generator {
    fn id(&self) -> &'static str;

    /// The model completions are requested from.
    fn model(&self) -> &str;

    /// Complete a single user prompt.
    ///
    /// * `prompt`: The full prompt, including any context.
    /// * `params`: Sampling parameters.
    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<Completion, DocQaError>;
}
