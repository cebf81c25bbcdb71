use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A piece of a document's extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Position of the chunk in the processed batch. Unique across all documents
    /// processed together.
    pub chunk_id: usize,

    pub document_id: Uuid,

    /// Name of the file the chunk originates from.
    pub source: String,

    /// Character offset of the chunk in the document's extracted text.
    pub offset: usize,

    pub content: String,

    /// Amount of characters in `content`.
    pub size: usize,
}

/// A chunk obtained from the index along with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredChunk {
    pub chunk: Chunk,

    /// Cosine similarity to the query vector.
    pub score: f32,
}

/// Describes the contents of a vector index. Persisted alongside the vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    /// The model used to embed the chunks.
    pub embedding_model: String,

    /// Vector size.
    pub dimension: usize,

    pub num_chunks: usize,

    pub created_at: DateTime<Utc>,
}

impl IndexConfig {
    pub fn new(embedding_model: &str, dimension: usize, num_chunks: usize) -> Self {
        Self {
            embedding_model: embedding_model.to_string(),
            dimension,
            num_chunks,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum IndexStatus {
    Initialized,
    NotInitialized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub status: IndexStatus,
    pub num_chunks: usize,
    pub embedding_model: Option<String>,
    pub dimension: Option<usize>,

    /// Distinct file names in the index, sorted.
    pub sources: Vec<String>,
}

impl IndexStats {
    pub fn empty() -> Self {
        Self {
            status: IndexStatus::NotInitialized,
            num_chunks: 0,
            embedding_model: None,
            dimension: None,
            sources: vec![],
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.status == IndexStatus::Initialized
    }
}

/// Statistics of a processed batch of chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub total_chunks: usize,
    pub total_characters: usize,
    pub average_chunk_size: usize,
    pub sources: Vec<String>,
    pub num_sources: usize,
}
