use crate::{
    app::{server::dto::UploadResult, state::AppState},
    core::{
        document::parser::ParseConfig,
        model::document::{Document, DocumentType},
        service::document::{DocumentService, DocumentUpload},
    },
    err,
    error::DocQaError,
    map_err,
};
use axum::{extract::State, Json};
use std::collections::HashMap;
use validify::Validate;

/// Multipart field holding an optional JSON [ParseConfig] for all files.
pub(crate) const PARSE_CONFIG_FIELD: &str = "parseConfig";

#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "List the documents processed in the session", body = [Document]),
    )
)]
pub(crate) async fn list_documents(state: State<AppState>) -> Json<Vec<Document>> {
    Json(state.session.documents().await)
}

#[utoipa::path(
    post,
    path = "/documents",
    responses(
        (status = 200, description = "Process the uploaded files and rebuild the index with them", body = UploadResult),
        (status = 400, description = "Malformed multipart body"),
        (status = 413, description = "Upload exceeds the body limit"),
        (status = 422, description = "No text could be extracted from any of the files or the parse config is invalid"),
        (status = 500, description = "Internal server error"),
        (status = 502, description = "Embedding provider error")
    ),
    request_body = axum::extract::Multipart
)]
pub(crate) async fn upload_documents(
    state: State<AppState>,
    mut form: axum::extract::Multipart,
) -> Result<Json<UploadResult>, DocQaError> {
    let mut uploads = vec![];
    let mut parse = ParseConfig::default();
    let mut errors = HashMap::<String, Vec<String>>::new();

    // A broken stream aborts the whole upload so the index is never
    // rebuilt from a partial set of files.
    while let Some(field) = map_err!(form.next_field().await) {
        if field.name() == Some(PARSE_CONFIG_FIELD) {
            let config = map_err!(field.text().await);
            parse = match serde_json::from_str(&config) {
                Ok(config) => config,
                Err(e) => return err!(InvalidInput, "invalid {PARSE_CONFIG_FIELD}: {e}"),
            };
            continue;
        }

        let Some(name) = field.file_name() else {
            continue;
        };

        let name = name.to_string();
        let file = map_err!(field.bytes().await);

        let ty = match DocumentType::try_from_file_name(&name) {
            Ok(ty) => ty,
            Err(e) => {
                tracing::error!("{e}");
                errors.entry(name).or_default().push(e.to_string());
                continue;
            }
        };

        uploads.push(DocumentUpload::new(name, ty, &file));
    }

    map_err!(parse.validate());

    if uploads.is_empty() {
        let mut errors = errors
            .iter()
            .map(|(name, errors)| format!("{name}: {}", errors.join(", ")))
            .collect::<Vec<_>>();
        errors.sort();

        return err!(
            NoDocuments,
            "no supported files were uploaded [{}]",
            errors.join("; ")
        );
    }

    let settings = state.session.settings().await;
    let config = settings.chunk_config()?;

    let service = state.services.document;
    let processed = map_err!(
        tokio::task::spawn_blocking(move || service.process(uploads, &parse, &config)).await
    )?;

    let index = state.services.vector.build(processed.chunks.clone()).await?;
    let stats = DocumentService::stats(&processed.chunks);

    for (name, file_errors) in processed.errors {
        errors.entry(name).or_default().extend(file_errors);
    }

    state
        .session
        .replace_documents(processed.documents.clone())
        .await;

    Ok(Json(UploadResult {
        documents: processed.documents,
        stats,
        index,
        errors,
    }))
}
