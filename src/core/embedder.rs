use crate::error::DocQaError;

/// Operations related to embeddings and their models.
#[async_trait::async_trait]
pub trait Embedder {
    fn id(&self) -> &'static str;

    /// Return the default embedding model and its vector size.
    fn default_model(&self) -> (String, usize);

    /// List all available models in the embedder and their vector sizes.
    async fn list_embedding_models(&self) -> Result<Vec<(String, usize)>, DocQaError>;

    /// Get the vectors for the elements in `content`.
    /// The content passed in can be a user's query,
    /// or a chunked document.
    ///
    /// * `content`: The text to embed.
    /// * `model`: The embedding model to use.
    async fn embed(&self, content: &[&str], model: &str) -> Result<Vec<Vec<f32>>, DocQaError>;

    /// Get the vector size of the given model, `None` if the model is not supported.
    ///
    /// * `model`: The embedding model.
    async fn size(&self, model: &str) -> Result<Option<usize>, DocQaError> {
        Ok(self
            .list_embedding_models()
            .await?
            .into_iter()
            .find(|(m, _)| m == model)
            .map(|(_, size)| size))
    }
}
