//! Test suites and utilites.

use super::{state::AppState, vector::flat::FlatIndex};
use crate::core::{
    embedder::Embedder,
    generator::{Completion, CompletionParams, Generator},
    model::{index::Chunk, session::Settings},
    provider::{DynGenerator, ProviderState},
    service::{
        document::DocumentService, qa::QaService, session::Session, vector::VectorService,
    },
};
use crate::error::DocQaError;
use regex::Regex;
use std::{
    hash::{DefaultHasher, Hash, Hasher},
    sync::{Arc, LazyLock, Mutex},
};
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_EMBEDDING_MODEL: &str = "hash-embedder";
pub const TEST_EMBEDDING_SIZE: usize = 512;
pub const TEST_LLM_MODEL: &str = "test-llm";

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

pub struct TestState {
    /// Holds the index directory so it doesn't get dropped.
    pub _dir: TempDir,

    pub app: AppState,

    pub document: DocumentService,
    pub vector: VectorService,
    pub qa: QaService,
    pub session: Arc<Session>,

    /// Inspect prompts sent to the generator.
    pub generator: Arc<RecordingGenerator>,
}

impl TestState {
    pub fn init() -> Self {
        Self::build(TEST_EMBEDDING_MODEL, TEST_EMBEDDING_SIZE, true)
    }

    pub fn init_with_model(model: &str) -> Self {
        Self::build(model, TEST_EMBEDDING_SIZE, true)
    }

    pub fn init_with_size(size: usize) -> Self {
        Self::build(TEST_EMBEDDING_MODEL, size, true)
    }

    pub fn init_without_generator() -> Self {
        Self::build(TEST_EMBEDDING_MODEL, TEST_EMBEDDING_SIZE, false)
    }

    fn build(model: &str, size: usize, with_generator: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(RecordingGenerator::default());

        let providers = ProviderState {
            vector: Arc::new(FlatIndex::new()),
            embedding: Arc::new(HashEmbedder::new(model, size)),
            generator: with_generator.then(|| generator.clone() as DynGenerator),
        };

        let app = AppState::from_parts(
            providers,
            model.to_string(),
            size,
            Settings::default(),
            dir.path().join("vector_store"),
        );

        Self {
            document: app.services.document,
            vector: app.services.vector.clone(),
            qa: app.services.qa.clone(),
            session: app.session.clone(),
            app,
            generator,
            _dir: dir,
        }
    }
}

/// Create a chunk that is not tied to any document.
pub fn chunk(id: usize, source: &str, content: &str) -> Chunk {
    Chunk {
        chunk_id: id,
        document_id: Uuid::nil(),
        source: source.to_string(),
        offset: 0,
        content: content.to_string(),
        size: content.chars().count(),
    }
}

/// Deterministic bag of words embedder. Every lowercased word increments the
/// bucket its hash lands in, so texts sharing words end up close to each other.
#[derive(Debug)]
pub struct HashEmbedder {
    model: String,
    size: usize,
}

impl HashEmbedder {
    pub fn new(model: &str, size: usize) -> Self {
        Self {
            model: model.to_string(),
            size,
        }
    }

    fn vector(&self, content: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.size];
        for token in TOKEN.find_iter(&content.to_lowercase()) {
            let mut hasher = DefaultHasher::new();
            token.as_str().hash(&mut hasher);
            vector[hasher.finish() as usize % self.size] += 1.0;
        }
        vector
    }
}

#[async_trait::async_trait]
impl Embedder for HashEmbedder {
    fn id(&self) -> &'static str {
        "hash"
    }

    fn default_model(&self) -> (String, usize) {
        (self.model.clone(), self.size)
    }

    async fn list_embedding_models(&self) -> Result<Vec<(String, usize)>, DocQaError> {
        Ok(vec![self.default_model()])
    }

    async fn embed(&self, content: &[&str], _model: &str) -> Result<Vec<Vec<f32>>, DocQaError> {
        Ok(content.iter().map(|c| self.vector(c)).collect())
    }
}

/// Answers every prompt with `Answer to: {prompt}` and remembers what it was asked.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    requests: Mutex<Vec<(String, CompletionParams)>>,
}

impl RecordingGenerator {
    pub fn requests(&self) -> Vec<(String, CompletionParams)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Generator for RecordingGenerator {
    fn id(&self) -> &'static str {
        "recording"
    }

    fn model(&self) -> &str {
        TEST_LLM_MODEL
    }

    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<Completion, DocQaError> {
        self.requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), params));

        Ok(Completion {
            content: format!("Answer to: {prompt}"),
            model: TEST_LLM_MODEL.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::new(TEST_EMBEDDING_MODEL, 64);

        let vectors = embedder
            .embed(&["Rust rust", "rust"], TEST_EMBEDDING_MODEL)
            .await
            .unwrap();

        assert_eq!(64, vectors[0].len());
        assert_eq!(2.0, vectors[0].iter().sum::<f32>());
        assert_eq!(
            vectors[1].iter().map(|x| x * 2.0).collect::<Vec<_>>(),
            vectors[0]
        );
    }
}
