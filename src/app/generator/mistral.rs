use crate::{
    core::generator::{Completion, CompletionParams, Generator},
    error::DocQaError,
    map_err,
};
use docqa_llm::mistral::{ChatRequest, MistralClient};
use tracing::debug;

/// Answers prompts with a Mistral chat model.
#[derive(Debug)]
pub struct MistralGenerator {
    client: MistralClient,
    model: String,
}

impl MistralGenerator {
    pub fn new(client: MistralClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Generator for MistralGenerator {
    fn id(&self) -> &'static str {
        "mistral"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<Completion, DocQaError> {
        let request = ChatRequest::user(
            &self.model,
            prompt,
            params.temperature,
            params.max_tokens,
        );

        let completion = map_err!(self.client.chat(&request).await);

        if let Some(ref usage) = completion.usage {
            debug!(
                "Completion used {} prompt and {} completion token(s)",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(Completion {
            content: completion.content,
            model: completion.model,
        })
    }
}
