use crate::{
    app::{server::dto::StatusResponse, state::AppState},
    core::model::{
        conversation::ConversationEntry,
        session::{Settings, SettingsUpdate},
    },
    error::DocQaError,
    map_err,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::Response,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Get the session, model and index status", body = StatusResponse),
    )
)]
pub(crate) async fn status(state: State<AppState>) -> Json<StatusResponse> {
    let (embedding_model, embedding_size) = state.services.vector.embedding_model();

    Json(StatusResponse {
        session_id: state.session.id(),
        started_at: state.session.started_at(),
        api_available: state.services.qa.is_available(),
        llm_provider: state.services.qa.provider().map(String::from),
        llm_model: state.services.qa.model().map(String::from),
        embedding_provider: state.services.vector.embedding_provider().to_string(),
        embedding_model: embedding_model.to_string(),
        embedding_size,
        vector_provider: state.services.vector.vector_provider().to_string(),
        settings: state.session.settings().await,
        num_documents: state.session.documents().await.len(),
        conversation_length: state.session.history().await.len(),
        index: state.services.vector.stats().await,
    })
}

#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Get the session settings", body = Settings),
    )
)]
pub(crate) async fn get_settings(state: State<AppState>) -> Json<Settings> {
    Json(state.session.settings().await)
}

#[utoipa::path(
    put,
    path = "/settings",
    responses(
        (status = 200, description = "Update the session settings. Chunking settings apply to the next upload.", body = Settings),
        (status = 422, description = "Invalid settings")
    ),
    request_body = SettingsUpdate
)]
pub(crate) async fn update_settings(
    state: State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>, DocQaError> {
    Ok(Json(state.session.update_settings(update).await?))
}

#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "List the conversation history", body = [ConversationEntry]),
    )
)]
pub(crate) async fn get_history(state: State<AppState>) -> Json<Vec<ConversationEntry>> {
    Json(state.session.history().await)
}

#[utoipa::path(
    delete,
    path = "/history",
    responses(
        (status = 204, description = "Clear the conversation history"),
    )
)]
pub(crate) async fn clear_history(state: State<AppState>) -> StatusCode {
    state.session.clear_history().await;
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/history/export",
    responses(
        (status = 200, description = "Export the session as a Markdown document", body = String, content_type = "text/markdown"),
        (status = 500, description = "Internal server error")
    )
)]
pub(crate) async fn export_history(state: State<AppState>) -> Result<Response, DocQaError> {
    let export = state.session.export_markdown().await;
    let file_name = format!("docqa_session_{}.md", Utc::now().format("%Y%m%d_%H%M%S"));
    markdown_attachment(&file_name, export)
}

#[utoipa::path(
    get,
    path = "/history/{id}/report",
    responses(
        (status = 200, description = "Export a single exchange as a Markdown report", body = String, content_type = "text/markdown"),
        (status = 404, description = "Exchange not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "Conversation entry ID")
    )
)]
pub(crate) async fn entry_report(
    state: State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, DocQaError> {
    let report = state.session.report(id).await?;
    markdown_attachment(&format!("docqa_report_{id}.md"), report)
}

#[utoipa::path(
    delete,
    path = "/session",
    responses(
        (status = 204, description = "Forget the processed documents, the history and the index"),
    )
)]
pub(crate) async fn reset_session(state: State<AppState>) -> StatusCode {
    state.session.reset().await;
    state.services.vector.clear().await;
    StatusCode::NO_CONTENT
}

fn markdown_attachment(file_name: &str, content: String) -> Result<Response, DocQaError> {
    let response = map_err!(Response::builder()
        .header(CONTENT_TYPE, "text/markdown; charset=utf-8")
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\"")
        )
        .body(Body::from(content)));
    Ok(response)
}
