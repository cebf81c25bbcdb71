use crate::{
    core::{
        model::index::{Chunk, IndexConfig, IndexStats, IndexStatus, ScoredChunk},
        vector::VectorDb,
    },
    err,
    error::DocQaError,
    map_err,
};
use rayon::prelude::*;
use std::{collections::BTreeSet, io::ErrorKind, path::Path};
use tokio::sync::RwLock;
use tracing::debug;

const CONFIG_FILE: &str = "config.json";
const CHUNKS_FILE: &str = "chunks.json";
const VECTORS_FILE: &str = "vectors.bin";

/// Exact inner product search over L2 normalized vectors, i.e. cosine similarity.
/// Every query is compared against every stored vector.
#[derive(Debug, Default)]
pub struct FlatIndex {
    data: RwLock<Option<IndexData>>,
}

#[derive(Debug)]
struct IndexData {
    config: IndexConfig,
    chunks: Vec<Chunk>,

    /// Normalized, `chunks[i]` belongs to `vectors[i]`.
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VectorDb for FlatIndex {
    fn id(&self) -> &'static str {
        "flat"
    }

    async fn build(
        &self,
        mut config: IndexConfig,
        chunks: Vec<Chunk>,
        mut vectors: Vec<Vec<f32>>,
    ) -> Result<(), DocQaError> {
        if chunks.is_empty() {
            return err!(InvalidInput, "cannot build an index without chunks");
        }

        check_vectors(&config, &chunks, &vectors)?;

        vectors.par_iter_mut().for_each(|v| normalize(v));

        config.num_chunks = chunks.len();

        *self.data.write().await = Some(IndexData {
            config,
            chunks,
            vectors,
        });

        Ok(())
    }

    async fn query(
        &self,
        mut search: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, DocQaError> {
        let data = self.data.read().await;

        let Some(data) = data.as_ref() else {
            return err!(NotReady, "the index is empty");
        };

        if search.len() != data.config.dimension {
            return err!(
                DimensionMismatch,
                "query has {} dimensions, index has {}",
                search.len(),
                data.config.dimension
            );
        }

        normalize(&mut search);

        let mut scores = data
            .vectors
            .par_iter()
            .enumerate()
            .map(|(i, vector)| (i, dot(&search, vector)))
            .collect::<Vec<_>>();

        scores.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        scores.truncate(limit);

        debug!(
            "Queried {} vector(s), returning {}",
            data.vectors.len(),
            scores.len()
        );

        Ok(scores
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: data.chunks[i].clone(),
                score,
            })
            .collect())
    }

    async fn stats(&self) -> IndexStats {
        let data = self.data.read().await;

        let Some(data) = data.as_ref() else {
            return IndexStats::empty();
        };

        let sources = data
            .chunks
            .iter()
            .map(|c| c.source.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        IndexStats {
            status: IndexStatus::Initialized,
            num_chunks: data.chunks.len(),
            embedding_model: Some(data.config.embedding_model.clone()),
            dimension: Some(data.config.dimension),
            sources,
        }
    }

    async fn clear(&self) {
        *self.data.write().await = None;
    }

    async fn save(&self, dir: &Path) -> Result<(), DocQaError> {
        let data = self.data.read().await;

        let Some(data) = data.as_ref() else {
            return err!(NotReady, "the index is empty, nothing to save");
        };

        map_err!(tokio::fs::create_dir_all(dir).await);

        let config = map_err!(serde_json::to_vec_pretty(&data.config));
        let chunks = map_err!(serde_json::to_vec(&data.chunks));
        let vectors = map_err!(bincode::serialize(&data.vectors));

        map_err!(tokio::fs::write(dir.join(CONFIG_FILE), config).await);
        map_err!(tokio::fs::write(dir.join(CHUNKS_FILE), chunks).await);
        map_err!(tokio::fs::write(dir.join(VECTORS_FILE), vectors).await);

        debug!(
            "Wrote {} vector(s) to '{}'",
            data.vectors.len(),
            dir.display()
        );

        Ok(())
    }

    async fn load(&self, dir: &Path, expected_dimension: usize) -> Result<IndexConfig, DocQaError> {
        if !map_err!(tokio::fs::try_exists(dir).await) {
            return err!(DoesNotExist, "Index directory '{}'", dir.display());
        }

        let config = read_file(dir, CONFIG_FILE).await?;
        let config: IndexConfig = map_err!(serde_json::from_slice(&config));

        if config.dimension != expected_dimension {
            return err!(
                DimensionMismatch,
                "index at '{}' has {} dimensions, the embedding model has {expected_dimension}",
                dir.display(),
                config.dimension
            );
        }

        let chunks = read_file(dir, CHUNKS_FILE).await?;
        let chunks: Vec<Chunk> = map_err!(serde_json::from_slice(&chunks));

        let vectors = read_file(dir, VECTORS_FILE).await?;
        let vectors: Vec<Vec<f32>> = map_err!(bincode::deserialize(&vectors));

        check_vectors(&config, &chunks, &vectors)?;

        *self.data.write().await = Some(IndexData {
            config: config.clone(),
            chunks,
            vectors,
        });

        Ok(config)
    }
}

async fn read_file(dir: &Path, file: &str) -> Result<Vec<u8>, DocQaError> {
    let path = dir.join(file);
    match tokio::fs::read(&path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            err!(DoesNotExist, "Index file '{}'", path.display())
        }
        Err(e) => Err(DocQaError::new(file!(), line!(), column!(), e.into())),
    }
}

fn check_vectors(
    config: &IndexConfig,
    chunks: &[Chunk],
    vectors: &[Vec<f32>],
) -> Result<(), DocQaError> {
    if chunks.len() != vectors.len() {
        return err!(
            InvalidInput,
            "amount of chunks ({}) does not match amount of vectors ({})",
            chunks.len(),
            vectors.len()
        );
    }

    if let Some(vector) = vectors.iter().find(|v| v.len() != config.dimension) {
        return err!(
            DimensionMismatch,
            "expected vectors with {} dimensions, found {}",
            config.dimension,
            vector.len()
        );
    }

    Ok(())
}

/// Scale `vector` to unit length. Zero vectors are left as they are.
fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
