use crate::{error::DocQaError, map_err};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ChunkConfig {
    Sliding(SlidingWindowConfig),
    Recursive(RecursiveWindowConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SlidingWindowConfig {
    pub size: usize,
    pub overlap: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecursiveWindowConfig {
    pub size: usize,
    pub overlap: usize,
    pub separators: Vec<String>,
}

impl ChunkConfig {
    /// Create a `SlidingWindow` chunker.
    ///
    /// * `size`: Chunk size in characters.
    /// * `overlap`: Chunk overlap in characters.
    pub fn sliding(size: usize, overlap: usize) -> Result<Self, DocQaError> {
        map_err!(chunx::SlidingWindow::new(size, overlap));
        Ok(Self::Sliding(SlidingWindowConfig { size, overlap }))
    }

    /// Create a `RecursiveWindow` chunker with the default separators.
    ///
    /// * `size`: Maximum chunk size in characters.
    /// * `overlap`: Maximum overlap between consecutive chunks in characters.
    pub fn recursive(size: usize, overlap: usize) -> Result<Self, DocQaError> {
        let config = map_err!(chunx::RecursiveWindow::new(size, overlap));
        Ok(Self::Recursive(RecursiveWindowConfig {
            size,
            overlap,
            separators: config.separators,
        }))
    }

    /// Create a default `RecursiveWindow` chunker.
    pub fn recursive_default() -> Self {
        let config = chunx::RecursiveWindow::default();
        Self::Recursive(RecursiveWindowConfig {
            size: config.size,
            overlap: config.overlap,
            separators: config.separators,
        })
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Sliding(config) => config.size,
            Self::Recursive(config) => config.size,
        }
    }

    pub fn overlap(&self) -> usize {
        match self {
            Self::Sliding(config) => config.overlap,
            Self::Recursive(config) => config.overlap,
        }
    }

    /// Chunk the input. Chunks are always slices of `input`.
    pub fn chunk<'a>(&self, input: &'a str) -> Result<Vec<&'a str>, DocQaError> {
        let chunks = match self {
            Self::Sliding(SlidingWindowConfig { size, overlap }) => {
                let chunker = map_err!(chunx::SlidingWindow::new(*size, *overlap));
                map_err!(chunker.chunk(input))
            }
            Self::Recursive(RecursiveWindowConfig {
                size,
                overlap,
                separators,
            }) => {
                let separators = separators.iter().map(String::as_str).collect::<Vec<_>>();
                let chunker = map_err!(chunx::RecursiveWindow::with_separators(
                    *size,
                    *overlap,
                    &separators
                ));
                map_err!(chunker.chunk(input))
            }
        };
        Ok(chunks)
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::recursive_default()
    }
}

impl std::fmt::Display for ChunkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sliding(_) => write!(f, "SlidingWindow"),
            Self::Recursive(_) => write!(f, "RecursiveWindow"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocQaErr;

    #[test]
    fn default_is_recursive() {
        let config = ChunkConfig::default();
        assert_eq!("RecursiveWindow", config.to_string());
        assert_eq!(1000, config.size());
        assert_eq!(200, config.overlap());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let error = ChunkConfig::sliding(10, 10).unwrap_err();
        assert!(matches!(error.error, DocQaErr::Chunker(_)));

        let error = ChunkConfig::recursive(10, 11).unwrap_err();
        assert!(matches!(error.error, DocQaErr::Chunker(_)));
    }

    #[test]
    fn chunks_with_both_chunkers() {
        let input = "The quick brown fox jumps over the lazy dog.\n\nPack my box with five dozen liquor jugs.";

        let sliding = ChunkConfig::sliding(20, 5).unwrap();
        let chunks = sliding.chunk(input).unwrap();
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));

        let recursive = ChunkConfig::recursive(50, 0).unwrap();
        let chunks = recursive.chunk(input).unwrap();
        assert_eq!(
            vec![
                "The quick brown fox jumps over the lazy dog.",
                "Pack my box with five dozen liquor jugs."
            ],
            chunks
        );
    }

    #[test]
    fn config_serializes_tagged() {
        let config = ChunkConfig::sliding(100, 10).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(100, json["sliding"]["size"]);
    }
}
