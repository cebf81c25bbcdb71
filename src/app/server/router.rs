use super::api::ApiDoc;
use crate::app::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, cors::CorsLayer, trace::TraceLayer};
use tracing::Span;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(crate) mod document;
pub(crate) mod index;
pub(crate) mod qa;
pub(crate) mod session;

pub fn router(state: AppState, origins: Vec<String>) -> Router {
    let origins = origins
        .into_iter()
        .filter_map(|origin| {
            tracing::info!("Adding {origin} to allowed origins");
            match HeaderValue::from_str(&origin) {
                Ok(origin) => Some(origin),
                Err(e) => {
                    tracing::warn!("Skipping invalid origin '{origin}': {e}");
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::list(origins))
        .allow_headers(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::PUT]);

    use document::*;
    use index::*;
    use qa::*;
    use session::*;

    Router::new()
        .route("/documents", post(upload_documents))
        .layer(DefaultBodyLimit::max(50_000_000))
        .route("/documents", get(list_documents))
        .route("/questions", post(ask_question))
        .route("/history", get(get_history))
        .route("/history", delete(clear_history))
        .route("/history/summary", post(summarize_history))
        .route("/history/export", get(export_history))
        .route("/history/:id/report", get(entry_report))
        .route("/status", get(status))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/index", get(index_stats))
        .route("/index/save", post(save_index))
        .route("/index/load", post(load_index))
        .route("/session", delete(reset_session))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .on_request(|req: &axum::http::Request<_>, _span: &Span| {
                    let ctype = req
                        .headers()
                        .get("content-type")
                        .map(|v| v.to_str().unwrap_or("none"))
                        .unwrap_or("none");

                    tracing::info!("Processing request | content-type: {ctype}");
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, _span: &Span| {
                        let status = res.status();
                        let ctype = res
                            .headers()
                            .get("content-type")
                            .map(|v| v.to_str().unwrap_or("none"))
                            .unwrap_or("none");

                        tracing::info!(
                            "Sending response | {status} | {}ms | {ctype}",
                            latency.as_millis()
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        tracing::error!("Error in request: {error}")
                    },
                ),
        )
        .layer(cors)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Has to go last to exclude all the tracing/cors layers
        .route("/_health", get(health_check))
}

#[utoipa::path(
    get,
    path = "/_health",
    responses(
        (status = 200, description = "Server is up", body = String),
    )
)]
pub(crate) async fn health_check() -> impl IntoResponse {
    "OK"
}
