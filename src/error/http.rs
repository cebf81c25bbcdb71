use super::{DocQaErr, DocQaError};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

impl DocQaError {
    pub fn status(&self) -> StatusCode {
        use DocQaErr as E;
        use StatusCode as SC;
        match self.error {
            E::DoesNotExist(_) => SC::NOT_FOUND,
            E::NotReady(_) | E::DimensionMismatch(_) => SC::CONFLICT,
            E::ApiUnavailable(_) => SC::SERVICE_UNAVAILABLE,
            E::Llm(_) => SC::BAD_GATEWAY,
            E::Multipart(ref e) => e.status(),
            E::Validation(_)
            | E::Regex(_)
            | E::Chunker(_)
            | E::InvalidInput(_)
            | E::InvalidFileName(_)
            | E::UnsupportedFileType(_)
            | E::NoDocuments(_)
            | E::ParsePdf(_)
            | E::InvalidEmbeddingModel(_) => SC::UNPROCESSABLE_ENTITY,
            E::Http(_)
            | E::IO(_)
            | E::Fmt(_)
            | E::SerdeJson(_)
            | E::Bincode(_)
            | E::Axum(_)
            | E::Join(_) => SC::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response wrapper.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResponseError<T: Serialize> {
    error_type: ErrorType,
    body: T,
}

impl<T> ResponseError<T>
where
    T: Serialize,
{
    pub fn new(error_type: ErrorType, body: T) -> Self {
        Self { error_type, body }
    }
}

#[derive(Debug, Serialize)]
enum ErrorType {
    Internal,
    Api,
}

impl<T> IntoResponse for ResponseError<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        <Json<ResponseError<T>> as IntoResponse>::into_response(Json(self))
    }
}

impl IntoResponse for DocQaError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        self.print();

        use DocQaErr as E;
        use ErrorType as ET;

        match self.error {
            E::Validation(errors) => (status, ResponseError::new(ET::Api, errors)).into_response(),

            E::DoesNotExist(e)
            | E::InvalidFileName(e)
            | E::UnsupportedFileType(e)
            | E::InvalidEmbeddingModel(e)
            | E::InvalidInput(e)
            | E::NoDocuments(e)
            | E::NotReady(e)
            | E::ApiUnavailable(e)
            | E::DimensionMismatch(e) => (status, ResponseError::new(ET::Api, e)).into_response(),

            E::Chunker(e) => (status, ResponseError::new(ET::Api, e.to_string())).into_response(),
            E::Regex(e) => (status, ResponseError::new(ET::Api, e.to_string())).into_response(),
            E::ParsePdf(e) => (status, ResponseError::new(ET::Api, e.to_string())).into_response(),
            E::Multipart(e) => (status, ResponseError::new(ET::Api, e.body_text())).into_response(),

            E::Llm(e) => (status, ResponseError::new(ET::Internal, e.to_string())).into_response(),

            E::IO(_)
            | E::Fmt(_)
            | E::SerdeJson(_)
            | E::Bincode(_)
            | E::Http(_)
            | E::Axum(_)
            | E::Join(_) => (
                status,
                ResponseError::new(ET::Internal, "Internal".to_string()),
            )
                .into_response(),
        }
    }
}
