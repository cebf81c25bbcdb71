use super::{embedder::Embedder, generator::Generator, vector::VectorDb};
use std::sync::Arc;

pub type DynVectorDb = Arc<dyn VectorDb + Send + Sync>;
pub type DynEmbedder = Arc<dyn Embedder + Send + Sync>;
pub type DynGenerator = Arc<dyn Generator + Send + Sync>;

/// Holds the concrete implementations the services operate on.
#[derive(Clone)]
pub struct ProviderState {
    /// Vector index.
    pub vector: DynVectorDb,

    /// Embedding provider.
    pub embedding: DynEmbedder,

    /// Answer generator. `None` when the LLM API is not configured.
    pub generator: Option<DynGenerator>,
}
