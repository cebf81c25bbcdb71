use super::index::ScoredChunk;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum amount of characters of a chunk shown in a citation.
pub const CITATION_PREVIEW_SIZE: usize = 200;

/// Reference to a chunk used to generate an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceCitation {
    /// 1-based position in the retrieved list. This is what the model refers to
    /// with "Source N".
    pub source_id: usize,
    pub filename: String,
    pub chunk_id: usize,
    pub relevance_score: f32,

    /// Chunk preview.
    pub content: String,
}

impl SourceCitation {
    /// Create citations for the retrieved chunks, in retrieval order.
    pub fn from_retrieved(chunks: &[ScoredChunk]) -> Vec<Self> {
        chunks
            .iter()
            .enumerate()
            .map(|(i, ScoredChunk { chunk, score })| SourceCitation {
                source_id: i + 1,
                filename: chunk.source.clone(),
                chunk_id: chunk.chunk_id,
                relevance_score: *score,
                content: preview(&chunk.content),
            })
            .collect()
    }
}

/// Truncate `content` to [CITATION_PREVIEW_SIZE] characters, appending `...` if anything was cut.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(CITATION_PREVIEW_SIZE) {
        Some((end, _)) => format!("{}...", &content[..end]),
        None => content.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<SourceCitation>,
    pub model_used: String,
    pub num_sources: usize,
}

/// A single question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourceCitation>,
    pub model_used: String,
    pub asked_at: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(question: &str, answer: Answer) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.to_string(),
            answer: answer.answer,
            sources: answer.sources,
            model_used: answer.model_used,
            asked_at: Utc::now(),
        }
    }
}

/// Aggregate information about the sources of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatistics {
    pub total_sources: usize,
    pub unique_files: usize,
    pub files_used: Vec<String>,
    pub average_relevance: f32,
    pub max_relevance: f32,
    pub min_relevance: f32,
}
