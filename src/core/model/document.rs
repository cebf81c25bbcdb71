use crate::{err, error::DocQaError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A processed document. Documents only live as long as the session they
/// were uploaded in.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,

    /// File name.
    pub name: String,

    /// File type, obtained from the extension.
    pub ty: DocumentType,

    /// Content hash.
    pub hash: String,

    /// Size of the uploaded file in bytes.
    pub file_size: usize,

    /// Amount of characters in the extracted text.
    pub characters: usize,

    pub uploaded_at: DateTime<Utc>,
}

/// All possible file types docqa can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    /// Plain text files.
    Text(TextDocumentType),

    /// PDF document.
    Pdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TextDocumentType {
    Md,
    Txt,
}

impl DocumentType {
    pub fn try_from_file_name(name: &str) -> Result<Self, DocQaError> {
        let Some((stem, ext)) = name.rsplit_once('.') else {
            return err!(InvalidFileName, "{name} - missing extension");
        };

        if stem.is_empty() || ext.is_empty() {
            return err!(InvalidFileName, "{name}");
        }

        Self::try_from(ext)
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(ext) => match ext {
                TextDocumentType::Md => write!(f, "md"),
                TextDocumentType::Txt => write!(f, "txt"),
            },
            Self::Pdf => write!(f, "pdf"),
        }
    }
}

impl TryFrom<&str> for DocumentType {
    type Error = DocQaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "md" => Ok(Self::Text(TextDocumentType::Md)),
            "txt" => Ok(Self::Text(TextDocumentType::Txt)),
            "pdf" => Ok(Self::Pdf),
            _ => err!(UnsupportedFileType, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocQaErr;

    #[test]
    fn document_type_from_file_name() {
        assert_eq!(
            DocumentType::Pdf,
            DocumentType::try_from_file_name("report.PDF").unwrap()
        );
        assert_eq!(
            DocumentType::Text(TextDocumentType::Md),
            DocumentType::try_from_file_name("notes.v2.md").unwrap()
        );
        assert_eq!("txt", DocumentType::try_from_file_name("a.txt").unwrap().to_string());
    }

    #[test]
    fn document_type_rejects_unsupported() {
        let error = DocumentType::try_from_file_name("sheet.xlsx").unwrap_err();
        assert!(matches!(error.error, DocQaErr::UnsupportedFileType(_)));

        let error = DocumentType::try_from_file_name("README").unwrap_err();
        assert!(matches!(error.error, DocQaErr::InvalidFileName(_)));

        let error = DocumentType::try_from_file_name(".pdf").unwrap_err();
        assert!(matches!(error.error, DocQaErr::InvalidFileName(_)));
    }
}
