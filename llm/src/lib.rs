//! Clients for the hosted and local models used by docqa.

pub mod error;

/// Local embedding models via fastembed.
pub mod fastembed;

/// Client for the Mistral API, used for both embeddings and chat completions.
pub mod mistral;
