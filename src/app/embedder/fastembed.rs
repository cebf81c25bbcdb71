use crate::{core::embedder::Embedder, error::DocQaError, map_err};

pub use docqa_llm::fastembed::local::LocalFastEmbedder;

#[async_trait::async_trait]
impl Embedder for LocalFastEmbedder {
    fn id(&self) -> &'static str {
        "fastembed"
    }

    fn default_model(&self) -> (String, usize) {
        self.default_model()
    }

    async fn list_embedding_models(&self) -> Result<Vec<(String, usize)>, DocQaError> {
        Ok(self.list_models())
    }

    async fn embed(&self, content: &[&str], model: &str) -> Result<Vec<Vec<f32>>, DocQaError> {
        Ok(map_err!(self.embed(content, model)))
    }
}
