use crate::{
    app::{
        server::dto::{QuestionPayload, QuestionResponse, SummaryResponse},
        state::AppState,
    },
    core::citation,
    error::DocQaError,
};
use axum::{extract::State, Json};

#[utoipa::path(
    post,
    path = "/questions",
    responses(
        (status = 200, description = "Answer a question using the processed documents", body = QuestionResponse),
        (status = 409, description = "No documents have been processed"),
        (status = 422, description = "Empty question or invalid amount of sources"),
        (status = 502, description = "LLM provider error"),
        (status = 503, description = "LLM API is not configured")
    ),
    request_body = QuestionPayload
)]
pub(crate) async fn ask_question(
    state: State<AppState>,
    Json(payload): Json<QuestionPayload>,
) -> Result<Json<QuestionResponse>, DocQaError> {
    let QuestionPayload { question, k } = payload;

    let k = match k {
        Some(k) => k,
        None => state.session.settings().await.k_sources,
    };

    let answer = state.services.qa.answer_question(&question, k).await?;

    let question = question.trim();

    let keywords = citation::extract_keywords(question);
    let cited_answer = citation::link_citations(&answer.answer, answer.num_sources);
    let formatted_sources = citation::format_sources(&answer.sources, question);
    let statistics = citation::source_statistics(&answer.sources);

    let entry = state.session.record(question, answer).await;

    Ok(Json(QuestionResponse {
        entry,
        cited_answer,
        formatted_sources,
        keywords,
        statistics,
    }))
}

#[utoipa::path(
    post,
    path = "/history/summary",
    responses(
        (status = 200, description = "Summarize the recent conversation", body = SummaryResponse),
        (status = 422, description = "There is no conversation to summarize"),
        (status = 502, description = "LLM provider error"),
        (status = 503, description = "LLM API is not configured")
    )
)]
pub(crate) async fn summarize_history(
    state: State<AppState>,
) -> Result<Json<SummaryResponse>, DocQaError> {
    let history = state.session.history().await;
    let summary = state.services.qa.summarize(&history).await?;
    Ok(Json(SummaryResponse { summary }))
}
