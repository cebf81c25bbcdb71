use crate::{
    core::{
        model::index::{Chunk, IndexConfig, IndexStats, ScoredChunk},
        provider::ProviderState,
    },
    err,
    error::DocQaError,
};
use std::path::Path;
use tracing::{info, warn};

/// High level operations related to embeddings (vectors) and their storage.
#[derive(Clone)]
pub struct VectorService {
    providers: ProviderState,

    /// Embedding model used for documents and queries.
    model: String,

    /// Vector size of `model`.
    size: usize,
}

impl VectorService {
    pub fn new(providers: ProviderState, model: String, size: usize) -> Self {
        Self {
            providers,
            model,
            size,
        }
    }

    /// The embedding model and its vector size.
    pub fn embedding_model(&self) -> (&str, usize) {
        (&self.model, self.size)
    }

    pub fn embedding_provider(&self) -> &'static str {
        self.providers.embedding.id()
    }

    pub fn vector_provider(&self) -> &'static str {
        self.providers.vector.id()
    }

    /// Embed the chunks and replace the contents of the index with them.
    ///
    /// * `chunks`: Chunks to index.
    pub async fn build(&self, chunks: Vec<Chunk>) -> Result<IndexStats, DocQaError> {
        if chunks.is_empty() {
            return err!(InvalidInput, "no chunks to index");
        }

        let content = chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>();

        let embeddings = self
            .providers
            .embedding
            .embed(&content, &self.model)
            .await?;

        if embeddings.len() != chunks.len() {
            return err!(
                DimensionMismatch,
                "received {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            );
        }

        let config = IndexConfig::new(&self.model, self.size, chunks.len());

        info!(
            "Building index with {} chunk(s) using '{}'",
            chunks.len(),
            self.model
        );

        self.providers
            .vector
            .build(config, chunks, embeddings)
            .await?;

        Ok(self.providers.vector.stats().await)
    }

    /// Retrieve the `limit` chunks most similar to `query`.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredChunk>, DocQaError> {
        if !self.providers.vector.stats().await.is_initialized() {
            return err!(NotReady, "no documents have been processed");
        }

        let mut embeddings = self
            .providers
            .embedding
            .embed(&[query], &self.model)
            .await?;

        let Some(query) = embeddings.pop() else {
            return err!(InvalidInput, "no embedding returned for query");
        };

        self.providers.vector.query(query, limit).await
    }

    pub async fn stats(&self) -> IndexStats {
        self.providers.vector.stats().await
    }

    pub async fn clear(&self) {
        self.providers.vector.clear().await
    }

    pub async fn save(&self, dir: &Path) -> Result<IndexStats, DocQaError> {
        self.providers.vector.save(dir).await?;
        info!("Saved index to '{}'", dir.display());
        Ok(self.stats().await)
    }

    /// Load a previously saved index. Fails if it was created with vectors
    /// of a different size than the current embedding model's.
    pub async fn load(&self, dir: &Path) -> Result<IndexStats, DocQaError> {
        let config = self.providers.vector.load(dir, self.size).await?;

        if config.embedding_model != self.model {
            warn!(
                "Index at '{}' was created with '{}', current model is '{}'",
                dir.display(),
                config.embedding_model,
                self.model
            );
        }

        info!(
            "Loaded index with {} chunk(s) from '{}'",
            config.num_chunks,
            dir.display()
        );

        Ok(self.stats().await)
    }
}
