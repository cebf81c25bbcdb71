use crate::{
    core::{
        citation,
        model::{
            conversation::{Answer, ConversationEntry},
            document::Document,
            session::{Settings, SettingsUpdate},
        },
    },
    err,
    error::DocQaError,
    map_err,
};
use chrono::{DateTime, Utc};
use std::{io::ErrorKind, path::Path};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;
use validify::Validate;

/// Format of timestamps in exports.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Documents of a persisted index, next to the index files.
pub const DOCUMENTS_FILE: &str = "documents.json";

/// The state of a single user's interaction with the application.
/// Holds the processed documents and the conversation history.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    state: RwLock<SessionState>,
}

#[derive(Debug, Default)]
struct SessionState {
    settings: Settings,
    documents: Vec<Document>,
    history: Vec<ConversationEntry>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: RwLock::new(SessionState {
                settings,
                ..Default::default()
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub async fn settings(&self) -> Settings {
        self.state.read().await.settings
    }

    /// Apply the update to the current settings. Nothing changes if the
    /// resulting settings are invalid.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<Settings, DocQaError> {
        let mut state = self.state.write().await;

        let settings = state.settings.merge(&update);
        map_err!(settings.validate());

        state.settings = settings;

        info!(
            "Updated settings: k = {}, chunk size = {}, overlap = {}, chunker = {:?}",
            settings.k_sources, settings.chunk_size, settings.chunk_overlap, settings.chunker
        );

        Ok(settings)
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.documents.clone()
    }

    /// Replace the processed documents, e.g. after the index was rebuilt.
    pub async fn replace_documents(&self, documents: Vec<Document>) {
        self.state.write().await.documents = documents;
    }

    /// Write the session's documents to `dir`, next to a saved index.
    pub async fn save_documents(&self, dir: &Path) -> Result<(), DocQaError> {
        let documents = map_err!(serde_json::to_vec_pretty(&self.state.read().await.documents));
        map_err!(tokio::fs::create_dir_all(dir).await);
        map_err!(tokio::fs::write(dir.join(DOCUMENTS_FILE), documents).await);
        Ok(())
    }

    /// Replace the session's documents with the ones saved in `dir`.
    /// Indexes saved without a document list leave the session without documents.
    pub async fn load_documents(&self, dir: &Path) -> Result<Vec<Document>, DocQaError> {
        let path = dir.join(DOCUMENTS_FILE);

        let documents = match tokio::fs::read(&path).await {
            Ok(contents) => map_err!(serde_json::from_slice::<Vec<Document>>(&contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No document list at '{}'", path.display());
                vec![]
            }
            Err(e) => return Err(DocQaError::new(file!(), line!(), column!(), e.into())),
        };

        self.replace_documents(documents.clone()).await;

        Ok(documents)
    }

    /// Append an exchange to the history.
    pub async fn record(&self, question: &str, answer: Answer) -> ConversationEntry {
        let entry = ConversationEntry::new(question, answer);
        self.state.write().await.history.push(entry.clone());
        entry
    }

    pub async fn history(&self) -> Vec<ConversationEntry> {
        self.state.read().await.history.clone()
    }

    pub async fn entry(&self, id: Uuid) -> Result<ConversationEntry, DocQaError> {
        let state = self.state.read().await;
        match state.history.iter().find(|e| e.id == id) {
            Some(entry) => Ok(entry.clone()),
            None => err!(DoesNotExist, "Conversation entry with ID '{id}'"),
        }
    }

    pub async fn clear_history(&self) {
        self.state.write().await.history.clear();
        info!("Cleared conversation history");
    }

    /// Forget documents and history. Settings are kept.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.documents.clear();
        state.history.clear();
        info!("Session reset");
    }

    /// Export the whole conversation as a Markdown document.
    pub async fn export_markdown(&self) -> String {
        let state = self.state.read().await;
        let now = Utc::now().format(TIMESTAMP_FORMAT);

        let documents = if state.documents.is_empty() {
            "None".to_string()
        } else {
            state
                .documents
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut out = vec![format!(
            "# Document Q&A Session\n\n**Session:** {}\n**Started on:** {}\n**Exported on:** {now}\n**Documents:** {documents}\n**Exchanges:** {}\n",
            self.id,
            self.started_at.format(TIMESTAMP_FORMAT),
            state.history.len()
        )];

        for entry in state.history.iter() {
            out.push(report(entry));
        }

        out.join("\n---\n\n")
    }

    /// Create a Markdown report for a single exchange.
    pub async fn report(&self, id: Uuid) -> Result<String, DocQaError> {
        let entry = self.entry(id).await?;
        Ok(report(&entry))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

fn report(entry: &ConversationEntry) -> String {
    citation::create_report(
        &entry.question,
        &entry.answer,
        &entry.sources,
        &entry.asked_at.format(TIMESTAMP_FORMAT).to_string(),
    )
}
