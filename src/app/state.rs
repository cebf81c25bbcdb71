use super::{generator::mistral::MistralGenerator, vector::flat::FlatIndex};
use crate::{
    config::{mistral_api_key, StartArgs},
    core::{
        model::session::Settings,
        provider::{DynEmbedder, DynGenerator, ProviderState},
        service::{
            document::DocumentService, qa::QaService, session::Session, vector::VectorService,
        },
    },
};
use docqa_llm::mistral::MistralClient;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;
use validify::Validate;

#[derive(Clone)]
pub struct AppState {
    /// docqa services.
    pub services: ServiceState,

    /// The session of the running server.
    pub session: Arc<Session>,

    /// Downstream service providers for docqa services.
    /// Used for displaying some metadata and in tests.
    pub providers: ProviderState,

    /// Default directory for saving and loading the index.
    pub index_path: PathBuf,
}

impl AppState {
    /// Load the application state using the provided configuration.
    pub async fn new(args: &StartArgs) -> Self {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from(args.log()))
            .init();

        let api_key = mistral_api_key();

        let embedding = Self::init_embedder(args, api_key.as_deref());
        let (model, size) = Self::init_embedding_model(args, &embedding).await;
        let generator = Self::init_generator(args, api_key.as_deref());

        tracing::info!(
            "Embedding with '{}' using '{model}' ({size} dimensions)",
            embedding.id()
        );

        let settings = Settings::new(args.k_sources(), args.chunk_size());
        if let Err(e) = settings.validate() {
            panic!("invalid default settings: {e}");
        }

        let providers = ProviderState {
            vector: Arc::new(FlatIndex::new()),
            embedding,
            generator,
        };

        Self::from_parts(providers, model, size, settings, args.index_path())
    }

    /// Wire up the services on top of already initialised providers.
    pub fn from_parts(
        providers: ProviderState,
        model: String,
        size: usize,
        settings: Settings,
        index_path: impl Into<PathBuf>,
    ) -> Self {
        let vector = VectorService::new(providers.clone(), model, size);
        let qa = QaService::new(providers.clone(), vector.clone());

        Self {
            services: ServiceState {
                document: DocumentService::new(),
                vector,
                qa,
            },
            session: Arc::new(Session::new(settings)),
            providers,
            index_path: index_path.into(),
        }
    }

    fn init_embedder(args: &StartArgs, api_key: Option<&str>) -> DynEmbedder {
        match args.embedder().as_str() {
            "mistral" => {
                let Some(key) = api_key else {
                    panic!("MISTRAL_API_KEY must be set when using the mistral embedder");
                };
                Arc::new(MistralClient::new(key).with_endpoint(&args.mistral_endpoint()))
            }

            #[cfg(feature = "fe-local")]
            "fastembed" => Arc::new(docqa_llm::fastembed::local::LocalFastEmbedder::new()),

            other => panic!("unsupported embedder: {other}"),
        }
    }

    /// Resolve the configured embedding model and its vector size,
    /// falling back to the embedder's default.
    async fn init_embedding_model(args: &StartArgs, embedder: &DynEmbedder) -> (String, usize) {
        let Some(model) = args.embedding_model() else {
            return embedder.default_model();
        };

        match embedder.size(&model).await {
            Ok(Some(size)) => (model, size),
            Ok(None) => panic!(
                "embedding model '{model}' is not supported by '{}'",
                embedder.id()
            ),
            Err(e) => {
                e.print();
                panic!("unable to list embedding models of '{}'", embedder.id());
            }
        }
    }

    fn init_generator(args: &StartArgs, api_key: Option<&str>) -> Option<DynGenerator> {
        let Some(key) = api_key else {
            tracing::warn!("MISTRAL_API_KEY is not set, question answering is disabled");
            return None;
        };

        let client = MistralClient::new(key).with_endpoint(&args.mistral_endpoint());
        let generator = MistralGenerator::new(client, &args.llm_model());

        tracing::info!("Answering with '{}'", args.llm_model());

        Some(Arc::new(generator))
    }
}

#[derive(Clone)]
pub struct ServiceState {
    pub document: DocumentService,
    pub vector: VectorService,
    pub qa: QaService,
}
