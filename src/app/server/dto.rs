//! Http specific DTOs.

use crate::core::model::{
    conversation::{ConversationEntry, SourceStatistics},
    document::Document,
    index::{DocumentStats, IndexStats},
    session::Settings,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadResult {
    /// Successfully processed documents.
    pub documents: Vec<Document>,

    pub stats: DocumentStats,

    /// The index after rebuilding it with the documents.
    pub index: IndexStats,

    /// Map file names to errors
    pub errors: HashMap<String, Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionPayload {
    pub question: String,

    /// Amount of sources to retrieve. Defaults to the session setting.
    pub k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionResponse {
    /// The exchange as stored in the history.
    pub entry: ConversationEntry,

    /// The answer with source references turned into Markdown links.
    pub cited_answer: String,

    /// Markdown rendition of the sources with the question's keywords highlighted.
    pub formatted_sources: String,

    pub keywords: Vec<String>,

    /// Absent when no sources were used.
    pub statistics: Option<SourceStatistics>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexPathPayload {
    /// Index directory. Defaults to the configured index path.
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusResponse {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,

    /// Whether questions can be answered, i.e. the LLM API is configured.
    pub api_available: bool,
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,

    pub embedding_provider: String,
    pub embedding_model: String,
    pub embedding_size: usize,

    pub vector_provider: String,

    pub settings: Settings,
    pub num_documents: usize,
    pub conversation_length: usize,
    pub index: IndexStats,
}
