use crate::{core::embedder::Embedder, error::DocQaError, map_err};
use docqa_llm::mistral::MISTRAL_EMBED;

pub use docqa_llm::mistral::MistralClient;

#[async_trait::async_trait]
impl Embedder for MistralClient {
    fn id(&self) -> &'static str {
        "mistral"
    }

    fn default_model(&self) -> (String, usize) {
        (String::from(MISTRAL_EMBED), 1024)
    }

    async fn list_embedding_models(&self) -> Result<Vec<(String, usize)>, DocQaError> {
        Ok(self.list_embedding_models())
    }

    async fn embed(&self, content: &[&str], model: &str) -> Result<Vec<Vec<f32>>, DocQaError> {
        Ok(map_err!(self.embed(content, model).await))
    }
}
