//! Module containing concrete implementations from the [core](crate::core) module.

/// Text embedder implementations.
pub mod embedder;

/// Answer generator implementations.
pub mod generator;

/// Application state configuration.
pub mod state;

/// Vector index implementations.
pub mod vector;

/// HTTP server implementation.
pub mod server;

#[cfg(test)]
pub mod test;
