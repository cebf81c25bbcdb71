use std::error::Error as _;
use thiserror::Error;
use tracing::error;
use validify::ValidationErrors;

pub mod http;

#[derive(Debug, Error)]
pub enum DocQaErr {
    #[error("Does not exist; {0}")]
    DoesNotExist(String),

    #[error("Invalid file name; {0}")]
    InvalidFileName(String),

    #[error("Unsupported file type; {0}")]
    UnsupportedFileType(String),

    #[error("Invalid embedding model; {0}")]
    InvalidEmbeddingModel(String),

    #[error("Invalid input; {0}")]
    InvalidInput(String),

    #[error("No documents; {0}")]
    NoDocuments(String),

    #[error("Not ready; {0}")]
    NotReady(String),

    #[error("API unavailable; {0}")]
    ApiUnavailable(String),

    #[error("Dimension mismatch; {0}")]
    DimensionMismatch(String),

    #[error("LLM; {0}")]
    Llm(#[from] docqa_llm::error::LlmError),

    #[error("IO; {0}")]
    IO(#[from] std::io::Error),

    #[error("FMT; {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("JSON error; {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Bincode; {0}")]
    Bincode(#[from] bincode::Error),

    #[error("chunker: {0}")]
    Chunker(#[from] chunx::ChunkerError),

    #[error("Parse pdf; {0}")]
    ParsePdf(#[from] lopdf::Error),

    #[error("Validation; {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Regex; {0}")]
    Regex(#[from] regex::Error),

    #[error("Http; {0}")]
    Http(#[from] axum::http::Error),

    #[error("Axum; {0}")]
    Axum(#[from] axum::Error),

    #[error("Multipart; {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Task; {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
#[error("{error}")]
pub struct DocQaError {
    file: &'static str,
    line: u32,
    column: u32,
    pub error: DocQaErr,
}

impl DocQaError {
    pub fn new(file: &'static str, line: u32, column: u32, error: DocQaErr) -> DocQaError {
        DocQaError {
            file,
            line,
            column,
            error,
        }
    }

    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }

    pub fn print(&self) {
        let location = self.location();

        error!("{location} | {self}");

        if self.error.source().is_some() {
            error!("Causes:");
        }

        let mut src = self.error.source();
        while let Some(source) = src {
            error!(" - {source}");
            src = source.source();
        }
    }
}

#[macro_export]
macro_rules! err {
    ($ty:ident $(, $l:literal $(,)? $($args:expr),* )?) => {
        Err($crate::error::DocQaError::new(
            file!(),
            line!(),
            column!(),
            $crate::error::DocQaErr::$ty $( (format!($l, $( $args, )*)) )?,
        ))
    };
}

#[macro_export]
macro_rules! map_err {
    ($ex:expr) => {
        $ex.map_err(|e| $crate::error::DocQaError::new(file!(), line!(), column!(), e.into()))?
    };
}
