use super::model::{
    conversation::{preview, ConversationEntry},
    index::ScoredChunk,
};
use std::fmt::Write;

/// Amount of most recent exchanges included in a conversation summary.
pub const SUMMARY_HISTORY_SIZE: usize = 5;

/// Create a prompt asking the model to answer `question` from the retrieved chunks.
/// Chunks are labeled `Source 1..n` in the order they are given.
pub fn context_prompt(question: &str, chunks: &[ScoredChunk]) -> String {
    if chunks.is_empty() {
        return general_prompt(question);
    }

    let mut context = String::new();

    for (i, ScoredChunk { chunk, score }) in chunks.iter().enumerate() {
        let _ = writeln!(
            context,
            "[Source {}: {}, Chunk {}, Relevance: {score:.3}]\n{}",
            i + 1,
            chunk.source,
            chunk.chunk_id,
            chunk.content
        );
        let _ = writeln!(context);
    }

    format!(
        r#"You are an intelligent document Q&A assistant. Answer the question based on the provided context from the documents.

Context from relevant documents:
{context}
Question: {question}

Instructions:
1. Answer the question based primarily on the provided context
2. If the context doesn't contain enough information, clearly state this
3. Cite specific sources when making claims (e.g., "According to Source 1...")
4. Be concise but comprehensive
5. If multiple sources provide different information, acknowledge this

Answer:"#
    )
}

/// Prompt used when there is no context to answer from.
pub fn general_prompt(question: &str) -> String {
    format!("Question: {question}\n\nPlease answer based on your general knowledge.")
}

/// Create a prompt asking the model to summarize the last
/// [SUMMARY_HISTORY_SIZE] exchanges of `history`.
pub fn summary_prompt(history: &[ConversationEntry]) -> String {
    let recent = &history[history.len().saturating_sub(SUMMARY_HISTORY_SIZE)..];

    let history_text = recent
        .iter()
        .map(|entry| format!("Q: {}\nA: {}", entry.question, preview(&entry.answer)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Summarize the following conversation between a user and a document Q&A system:

{history_text}

Provide a brief summary of the main topics discussed and key information provided."#
    )
}
