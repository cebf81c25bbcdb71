use super::vector::VectorService;
use crate::{
    core::{
        generator::CompletionParams,
        model::{
            conversation::{Answer, ConversationEntry, SourceCitation},
            session::{MAX_K_SOURCES, MIN_K_SOURCES},
        },
        prompt,
        provider::ProviderState,
    },
    err,
    error::DocQaError,
};
use tracing::{debug, info};

/// Answers questions using the indexed documents as context.
#[derive(Clone)]
pub struct QaService {
    providers: ProviderState,
    vector: VectorService,
}

impl QaService {
    pub fn new(providers: ProviderState, vector: VectorService) -> Self {
        Self { providers, vector }
    }

    /// Whether the answer generator is configured.
    pub fn is_available(&self) -> bool {
        self.providers.generator.is_some()
    }

    /// The generator provider, if one is configured.
    pub fn provider(&self) -> Option<&'static str> {
        self.providers.generator.as_ref().map(|g| g.id())
    }

    /// The model used for answering, if a generator is configured.
    pub fn model(&self) -> Option<&str> {
        self.providers.generator.as_ref().map(|g| g.model())
    }

    /// Retrieve the `k` most relevant chunks for `question` and let the
    /// generator answer it using them as context.
    ///
    /// * `question`: The user's question.
    /// * `k`: Amount of chunks to retrieve, between 1 and 10.
    pub async fn answer_question(&self, question: &str, k: usize) -> Result<Answer, DocQaError> {
        let question = question.trim();

        if question.is_empty() {
            return err!(InvalidInput, "Please provide a question");
        }

        if !(MIN_K_SOURCES..=MAX_K_SOURCES).contains(&k) {
            return err!(
                InvalidInput,
                "k must be between {MIN_K_SOURCES} and {MAX_K_SOURCES}, got {k}"
            );
        }

        let Some(ref generator) = self.providers.generator else {
            return err!(ApiUnavailable, "Mistral API key not configured");
        };

        let retrieved = self.vector.search(question, k).await?;

        debug!(
            "Retrieved {} chunk(s) for question, best score {:?}",
            retrieved.len(),
            retrieved.first().map(|r| r.score)
        );

        let prompt = prompt::context_prompt(question, &retrieved);

        let completion = generator.complete(&prompt, CompletionParams::ANSWER).await?;

        let sources = SourceCitation::from_retrieved(&retrieved);

        info!(
            "Answered question with '{}' using {} source(s)",
            completion.model,
            sources.len()
        );

        Ok(Answer {
            answer: completion.content,
            num_sources: sources.len(),
            sources,
            model_used: generator.model().to_string(),
        })
    }

    /// Summarize the most recent exchanges of a conversation.
    pub async fn summarize(&self, history: &[ConversationEntry]) -> Result<String, DocQaError> {
        if history.is_empty() {
            return err!(InvalidInput, "No conversation to summarize");
        }

        let Some(ref generator) = self.providers.generator else {
            return err!(ApiUnavailable, "Mistral API key not configured");
        };

        let prompt = prompt::summary_prompt(history);

        let completion = generator
            .complete(&prompt, CompletionParams::SUMMARY)
            .await?;

        Ok(completion.content)
    }
}
