use crate::error::LlmError;
use fastembed::{EmbeddingModel, ModelInfo};
use std::collections::HashMap;

/// Models loaded on startup. The first one is the default.
const MODEL_LIST: &[EmbeddingModel] = &[
    EmbeddingModel::AllMiniLML6V2,
    EmbeddingModel::BGESmallENV15,
];

pub struct LocalFastEmbedder {
    models: HashMap<String, (fastembed::TextEmbedding, usize)>,
    default_model: (String, usize),
}

impl LocalFastEmbedder {
    /// Initialise the FastEmbedder locally, downloading the models if necessary.
    pub fn new() -> Self {
        tracing::info!("Initializing local Fastembed");

        let mut models = HashMap::new();
        let mut default_model = None;

        for model in list_models() {
            tracing::info!("Setting up text embedding model: {}", model.model_code);
            let embedding = fastembed::TextEmbedding::try_new(
                fastembed::InitOptions::new(model.model.clone()).with_show_download_progress(true),
            )
            .unwrap_or_else(|e| panic!("error while instantiating text embedding model: {e}"));

            if model.model == MODEL_LIST[0] {
                default_model = Some((model.model_code.to_string(), model.dim));
            }

            models.insert(model.model_code.to_string(), (embedding, model.dim));
        }

        let Some(default_model) = default_model else {
            panic!("default fastembed model not supported");
        };

        Self {
            models,
            default_model,
        }
    }

    /// The default model and its vector size.
    pub fn default_model(&self) -> (String, usize) {
        self.default_model.clone()
    }

    pub fn list_models(&self) -> Vec<(String, usize)> {
        self.models
            .iter()
            .map(|(name, (_, size))| (name.clone(), *size))
            .collect()
    }

    pub fn embed(&self, content: &[&str], model: &str) -> Result<Vec<Vec<f32>>, LlmError> {
        let (embedder, _) = self.models.get(model).ok_or_else(|| {
            LlmError::InvalidModel(format!("model '{model}' not supported by fastembed"))
        })?;

        let embeddings = embedder
            .embed(content.to_vec(), None)
            .map_err(|e| LlmError::Fastembed(e.to_string()))?;

        debug_assert_eq!(
            embeddings.len(),
            content.len(),
            "Content length is different from embeddings!"
        );

        Ok(embeddings)
    }
}

fn list_models() -> Vec<ModelInfo<EmbeddingModel>> {
    fastembed::TextEmbedding::list_supported_models()
        .into_iter()
        .filter(|model| MODEL_LIST.contains(&model.model))
        .collect()
}

impl Default for LocalFastEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocalFastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFastEmbedder")
            .field("default_model", &self.default_model)
            .finish()
    }
}
