use clap::Parser;

/// The default host to listen on.
const DEFAULT_HOST: &str = "127.0.0.1";
/// The default port to listen on.
const DEFAULT_PORT: u16 = 8501;
/// The default directory for saving and loading the vector index.
pub const DEFAULT_INDEX_PATH: &str = "vector_store";
/// The default chat completion model.
pub const DEFAULT_LLM_MODEL: &str = docqa_llm::mistral::MISTRAL_LARGE_LATEST;
/// The default Mistral API endpoint.
pub const DEFAULT_MISTRAL_ENDPOINT: &str = "https://api.mistral.ai";
/// The default amount of sources retrieved per question.
pub const DEFAULT_K_SOURCES: usize = 5;
/// The default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// The default chunk overlap in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

#[cfg(feature = "fe-local")]
const DEFAULT_EMBEDDER: &str = "fastembed";
#[cfg(not(feature = "fe-local"))]
const DEFAULT_EMBEDDER: &str = "mistral";

#[derive(Debug, Parser)]
#[command(name = "docqa", version = "0.1", about = "Ask questions about your documents", long_about = None)]
pub struct StartArgs {
    /// Host to listen on.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// RUST_LOG string to use as the env filter.
    #[arg(short, long)]
    log: Option<String>,

    /// Directory used when saving and loading the vector index.
    #[arg(short, long)]
    index_path: Option<String>,

    /// Embedding provider, `mistral` or `fastembed`.
    #[arg(short, long)]
    embedder: Option<String>,

    /// Embedding model to use. Defaults to the provider's default model.
    #[arg(long)]
    embedding_model: Option<String>,

    /// Chat completion model used for answering questions.
    #[arg(long)]
    llm_model: Option<String>,

    /// Mistral API endpoint.
    #[arg(long)]
    mistral_endpoint: Option<String>,

    /// CORS allowed origins.
    #[arg(long)]
    cors_allowed_origins: Option<String>,

    /// Default amount of sources retrieved per question.
    #[arg(short, long)]
    k_sources: Option<usize>,

    /// Default chunk size in characters.
    #[arg(short, long)]
    chunk_size: Option<usize>,
}

/// Implement a getter method on [StartArgs], using the `$var` environment variable as a fallback
/// and either panic or default if neither the argument nor the environment variable is set.
macro_rules! arg {
    ($id:ident, $var:literal, panic $msg:literal) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => panic!($msg),
                    },
                }
            }
        }
    };
    ($id:ident, $var:literal, default $value:expr) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => $value,
                    },
                }
            }
        }
    };
    ($id:ident: $ty:ty, $var:literal, default $value:expr) => {
        impl StartArgs {
            pub fn $id(&self) -> $ty {
                match self.$id {
                    Some(val) => val,
                    None => match std::env::var($var) {
                        Ok(val) => val
                            .parse()
                            .unwrap_or_else(|e| panic!("Invalid value for {}: {e}", $var)),
                        Err(_) => $value,
                    },
                }
            }
        }
    };
}

impl StartArgs {
    pub fn allowed_origins(&self) -> Vec<String> {
        let origins = match &self.cors_allowed_origins {
            Some(origins) => origins.clone(),
            None => std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        };

        origins
            .split(',')
            .map(str::trim)
            .filter_map(|o| (!o.is_empty()).then_some(String::from(o)))
            .collect()
    }

    /// The embedding model set by the user, if any.
    pub fn embedding_model(&self) -> Option<String> {
        self.embedding_model
            .clone()
            .or_else(|| std::env::var("EMBEDDING_MODEL").ok())
            .filter(|model| !model.is_empty())
    }

    /// Address to bind the listener to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}

/// The Mistral API key. Loaded only from the environment.
pub fn mistral_api_key() -> Option<String> {
    std::env::var("MISTRAL_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

arg!(host,                    "HOST",             default DEFAULT_HOST.to_string());
arg!(port: u16,               "PORT",             default DEFAULT_PORT);
arg!(log,                     "RUST_LOG",         default "info".to_string());
arg!(index_path,              "INDEX_PATH",       default DEFAULT_INDEX_PATH.to_string());
arg!(embedder,                "EMBEDDER",         default DEFAULT_EMBEDDER.to_string());
arg!(llm_model,               "LLM_MODEL",        default DEFAULT_LLM_MODEL.to_string());
arg!(mistral_endpoint,        "MISTRAL_ENDPOINT", default DEFAULT_MISTRAL_ENDPOINT.to_string());
arg!(k_sources: usize,        "K_SOURCES",        default DEFAULT_K_SOURCES);
arg!(chunk_size: usize,       "CHUNK_SIZE",       default DEFAULT_CHUNK_SIZE);
