use crate::{
    core::model::index::{Chunk, IndexConfig, IndexStats, ScoredChunk},
    error::DocQaError,
};
use std::path::Path;

/// Vector index operations.
#[async_trait::async_trait]
pub trait VectorDb {
    fn id(&self) -> &'static str;

    /// Replace the contents of the index.
    /// The `chunks` and `vectors` inputs are expected to
    /// be 1:1, i.e. the same index into both lists should
    /// yield the chunk and its respective embedding.
    ///
    /// * `config`: Describes the vectors.
    /// * `chunks`: The chunks the vectors were created from.
    /// * `vectors`: The vectors to store.
    async fn build(
        &self,
        config: IndexConfig,
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<(), DocQaError>;

    /// Perform semantic search. Results are ordered by descending similarity.
    ///
    /// * `search`: The query vector.
    /// * `limit`: Amount of results to return.
    async fn query(&self, search: Vec<f32>, limit: usize)
        -> Result<Vec<ScoredChunk>, DocQaError>;

    async fn stats(&self) -> IndexStats;

    /// Remove everything from the index.
    async fn clear(&self);

    /// Persist the index to `dir`, creating it if necessary.
    async fn save(&self, dir: &Path) -> Result<(), DocQaError>;

    /// Replace the index with the one persisted in `dir`. The current
    /// index is left untouched if loading fails.
    ///
    /// * `dir`: The directory the index was saved to.
    /// * `expected_dimension`: The vector size of the active embedding model.
    async fn load(&self, dir: &Path, expected_dimension: usize)
        -> Result<IndexConfig, DocQaError>;
}
