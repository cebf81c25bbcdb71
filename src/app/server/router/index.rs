use crate::{
    app::{server::dto::IndexPathPayload, state::AppState},
    core::model::index::IndexStats,
    error::DocQaError,
};
use axum::{extract::State, Json};
use std::path::PathBuf;

#[utoipa::path(
    get,
    path = "/index",
    responses(
        (status = 200, description = "Get vector index statistics", body = IndexStats),
    )
)]
pub(crate) async fn index_stats(state: State<AppState>) -> Json<IndexStats> {
    Json(state.services.vector.stats().await)
}

#[utoipa::path(
    post,
    path = "/index/save",
    responses(
        (status = 200, description = "Persist the vector index and the session's documents", body = IndexStats),
        (status = 409, description = "The index is empty"),
        (status = 500, description = "Internal server error")
    ),
    request_body = IndexPathPayload
)]
pub(crate) async fn save_index(
    state: State<AppState>,
    payload: Option<Json<IndexPathPayload>>,
) -> Result<Json<IndexStats>, DocQaError> {
    let path = index_path(&state, payload);
    let stats = state.services.vector.save(&path).await?;
    state.session.save_documents(&path).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    post,
    path = "/index/load",
    responses(
        (status = 200, description = "Replace the vector index and the session's documents with persisted ones", body = IndexStats),
        (status = 404, description = "No index found at the path"),
        (status = 409, description = "The index was created with a different vector size"),
        (status = 500, description = "Internal server error")
    ),
    request_body = IndexPathPayload
)]
pub(crate) async fn load_index(
    state: State<AppState>,
    payload: Option<Json<IndexPathPayload>>,
) -> Result<Json<IndexStats>, DocQaError> {
    let path = index_path(&state, payload);
    let stats = state.services.vector.load(&path).await?;
    state.session.load_documents(&path).await?;
    Ok(Json(stats))
}

fn index_path(state: &AppState, payload: Option<Json<IndexPathPayload>>) -> PathBuf {
    payload
        .and_then(|Json(payload)| payload.path)
        .map(PathBuf::from)
        .unwrap_or_else(|| state.index_path.clone())
}
