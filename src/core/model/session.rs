use crate::{
    config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_K_SOURCES},
    core::chunk::ChunkConfig,
    error::DocQaError,
};
use serde::{Deserialize, Serialize};
use validify::{schema_err, schema_validation, Validate, ValidationErrors};

pub const MIN_K_SOURCES: usize = 1;
pub const MAX_K_SOURCES: usize = 10;
pub const MIN_CHUNK_SIZE: usize = 500;
pub const MAX_CHUNK_SIZE: usize = 2000;

/// User adjustable parameters of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(Self::validate_schema)]
pub struct Settings {
    /// Amount of chunks retrieved per question.
    pub k_sources: usize,

    /// Chunk size in characters, applied on the next upload.
    pub chunk_size: usize,

    /// Chunk overlap in characters, applied on the next upload.
    pub chunk_overlap: usize,

    /// Chunker used on the next upload.
    pub chunker: ChunkerKind,
}

/// Selects the chunking strategy of a session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum ChunkerKind {
    /// Fixed size windows.
    Sliding,

    /// Separator aware splitting.
    #[default]
    Recursive,
}

impl Settings {
    pub fn new(k_sources: usize, chunk_size: usize) -> Self {
        Self {
            k_sources,
            chunk_size,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP.min(chunk_size.saturating_sub(1)),
            chunker: ChunkerKind::default(),
        }
    }

    /// The chunker configuration uploads are processed with.
    pub fn chunk_config(&self) -> Result<ChunkConfig, DocQaError> {
        match self.chunker {
            ChunkerKind::Sliding => ChunkConfig::sliding(self.chunk_size, self.chunk_overlap),
            ChunkerKind::Recursive => ChunkConfig::recursive(self.chunk_size, self.chunk_overlap),
        }
    }

    /// Return a copy of these settings with the values from `update`.
    pub fn merge(&self, update: &SettingsUpdate) -> Self {
        Self {
            k_sources: update.k_sources.unwrap_or(self.k_sources),
            chunk_size: update.chunk_size.unwrap_or(self.chunk_size),
            chunk_overlap: update.chunk_overlap.unwrap_or(self.chunk_overlap),
            chunker: update.chunker.unwrap_or(self.chunker),
        }
    }

    #[schema_validation]
    fn validate_schema(&self) -> Result<(), ValidationErrors> {
        if !(MIN_K_SOURCES..=MAX_K_SOURCES).contains(&self.k_sources) {
            schema_err!(
                "kSources",
                "kSources must be between 1 and 10"
            );
        }
        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            schema_err!(
                "chunkSize",
                "chunkSize must be between 500 and 2000"
            );
        }
        if self.chunk_overlap >= self.chunk_size {
            schema_err!(
                "chunkOverlap>=chunkSize",
                "chunkOverlap must be less than chunkSize"
            );
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_K_SOURCES, DEFAULT_CHUNK_SIZE)
    }
}

/// Partial settings update. Missing fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub k_sources: Option<usize>,
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub chunker: Option<ChunkerKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = Settings::default();
        assert_eq!(5, settings.k_sources);
        assert_eq!(1000, settings.chunk_size);
        assert_eq!(200, settings.chunk_overlap);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn settings_bounds() {
        assert!(Settings::new(0, 1000).validate().is_err());
        assert!(Settings::new(11, 1000).validate().is_err());
        assert!(Settings::new(10, 499).validate().is_err());
        assert!(Settings::new(10, 2001).validate().is_err());
        assert!(Settings::new(1, 500).validate().is_ok());
        assert!(Settings::new(10, 2000).validate().is_ok());
    }

    #[test]
    fn settings_overlap_must_be_smaller() {
        let settings = Settings::default().merge(&SettingsUpdate {
            chunk_overlap: Some(1000),
            ..Default::default()
        });
        assert!(settings.validate().is_err());
    }

    #[test]
    fn settings_merge_keeps_missing() {
        let settings = Settings::default().merge(&SettingsUpdate {
            k_sources: Some(8),
            ..Default::default()
        });
        assert_eq!(8, settings.k_sources);
        assert_eq!(1000, settings.chunk_size);
        assert_eq!(200, settings.chunk_overlap);
        assert_eq!(ChunkerKind::Recursive, settings.chunker);
    }

    #[test]
    fn settings_select_chunker() {
        let settings = Settings::default();
        assert!(matches!(
            settings.chunk_config().unwrap(),
            ChunkConfig::Recursive(_)
        ));

        let settings = settings.merge(&SettingsUpdate {
            chunker: Some(ChunkerKind::Sliding),
            chunk_overlap: Some(100),
            ..Default::default()
        });
        let ChunkConfig::Sliding(config) = settings.chunk_config().unwrap() else {
            panic!("expected a sliding window config");
        };
        assert_eq!(1000, config.size);
        assert_eq!(100, config.overlap);
    }

    #[test]
    fn chunker_kind_is_camel_case() {
        let update: SettingsUpdate = serde_json::from_str(r#"{"chunker":"sliding"}"#).unwrap();
        assert_eq!(Some(ChunkerKind::Sliding), update.chunker);
    }
}
