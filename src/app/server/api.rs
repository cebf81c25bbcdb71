#[rustfmt::skip]
use super::router::{
    __path_health_check,
    // Documents
    document::{__path_list_documents, __path_upload_documents},
    // Questions
    qa::{__path_ask_question, __path_summarize_history},
    // Session
    session::{
        __path_status,
        __path_get_settings,
        __path_update_settings,
        __path_get_history,
        __path_clear_history,
        __path_export_history,
        __path_entry_report,
        __path_reset_session,
    },
    // Index
    index::{__path_index_stats, __path_save_index, __path_load_index},
};
use super::dto::{
    IndexPathPayload, QuestionPayload, QuestionResponse, StatusResponse, SummaryResponse,
    UploadResult,
};
use crate::core::{
    document::parser::ParseConfig,
    model::{
        conversation::{ConversationEntry, SourceCitation, SourceStatistics},
        document::{Document, DocumentType, TextDocumentType},
        index::{DocumentStats, IndexStats, IndexStatus},
        session::{ChunkerKind, Settings, SettingsUpdate},
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Documents
        list_documents,
        upload_documents,
        // Questions
        ask_question,
        summarize_history,
        // Session
        status,
        get_settings,
        update_settings,
        get_history,
        clear_history,
        export_history,
        entry_report,
        reset_session,
        // Index
        index_stats,
        save_index,
        load_index,
    ),
    components(schemas(
        Document,
        DocumentType,
        TextDocumentType,
        DocumentStats,
        IndexStats,
        IndexStatus,
        Settings,
        SettingsUpdate,
        ChunkerKind,
        ParseConfig,
        ConversationEntry,
        SourceCitation,
        SourceStatistics,
        UploadResult,
        QuestionPayload,
        QuestionResponse,
        SummaryResponse,
        StatusResponse,
        IndexPathPayload,
    )),
    tags(
        (name = "docqa", description = "Document question answering API")
    )
)]
pub struct ApiDoc;
