use crate::{
    core::{
        chunk::ChunkConfig,
        document::{
            parser::{ParseConfig, Parser},
            sha256,
        },
        model::{
            document::{Document, DocumentType},
            index::{Chunk, DocumentStats},
        },
    },
    err,
    error::DocQaError,
};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// An uploaded file.
#[derive(Debug)]
pub struct DocumentUpload {
    pub name: String,
    pub ty: DocumentType,
    pub file: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(name: String, ty: DocumentType, file: &[u8]) -> Self {
        Self {
            name,
            ty,
            file: file.to_vec(),
        }
    }
}

/// The result of processing a batch of uploads.
#[derive(Debug, Default)]
pub struct ProcessedDocuments {
    pub documents: Vec<Document>,

    /// Chunks of all documents, ordered by `chunk_id`.
    pub chunks: Vec<Chunk>,

    /// Map file names to errors.
    pub errors: HashMap<String, Vec<String>>,
}

impl ProcessedDocuments {
    fn push_error(&mut self, name: &str, error: impl ToString) {
        self.errors
            .entry(name.to_string())
            .or_default()
            .push(error.to_string());
    }
}

/// Turns uploads into chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentService;

impl DocumentService {
    pub fn new() -> Self {
        Self
    }

    /// Parse and chunk the uploads. Files that cannot be processed are reported
    /// in [ProcessedDocuments::errors]. Chunk IDs are assigned in processing order
    /// across all documents, starting from 0.
    ///
    /// Errors if not a single document yields any chunks.
    ///
    /// * `uploads`: Uploaded files.
    /// * `parse`: Parsing configuration for all files.
    /// * `config`: Chunking configuration for all files.
    pub fn process(
        &self,
        uploads: Vec<DocumentUpload>,
        parse: &ParseConfig,
        config: &ChunkConfig,
    ) -> Result<ProcessedDocuments, DocQaError> {
        let mut processed = ProcessedDocuments::default();

        // Map hashes to file names
        let mut hashes = HashMap::<String, String>::new();

        for upload in uploads {
            let DocumentUpload { name, ty, file } = upload;

            let hash = sha256(&file);

            if let Some(existing) = hashes.get(&hash) {
                warn!("Skipping '{name}', duplicate of '{existing}'");
                processed.push_error(&name, format!("Duplicate of '{existing}'"));
                continue;
            }

            let parser = Parser::new_from(ty, parse.clone())?;

            let text = match parser.parse(&file) {
                Ok(text) => text,
                Err(e) => {
                    e.print();
                    processed.push_error(&name, e);
                    continue;
                }
            };

            if text.trim().is_empty() {
                warn!("No text extracted from '{name}'");
                processed.push_error(&name, "No text could be extracted from the file");
                continue;
            }

            let chunks = match config.chunk(&text) {
                Ok(chunks) => chunks,
                Err(e) => {
                    e.print();
                    processed.push_error(&name, e);
                    continue;
                }
            };

            let document = Document {
                id: Uuid::new_v4(),
                name: name.clone(),
                ty,
                hash: hash.clone(),
                file_size: file.len(),
                characters: text.chars().count(),
                uploaded_at: Utc::now(),
            };

            let offsets = char_offsets(&text, &chunks);
            let first_id = processed.chunks.len();

            for (i, (chunk, offset)) in chunks.iter().zip(offsets).enumerate() {
                processed.chunks.push(Chunk {
                    chunk_id: first_id + i,
                    document_id: document.id,
                    source: name.clone(),
                    offset,
                    content: chunk.to_string(),
                    size: chunk.chars().count(),
                });
            }

            debug!(
                "Processed '{name}' ({ty}) into {} chunk(s) using {config}",
                chunks.len()
            );

            hashes.insert(hash, name);
            processed.documents.push(document);
        }

        if processed.documents.is_empty() {
            let mut errors = processed
                .errors
                .iter()
                .map(|(name, errors)| format!("{name}: {}", errors.join(", ")))
                .collect::<Vec<_>>();
            errors.sort();

            return err!(
                NoDocuments,
                "no text could be extracted from the uploaded files [{}]",
                errors.join("; ")
            );
        }

        info!(
            "Processed {} document(s) into {} chunk(s)",
            processed.documents.len(),
            processed.chunks.len()
        );

        Ok(processed)
    }

    /// Compute statistics for the given chunks.
    pub fn stats(chunks: &[Chunk]) -> DocumentStats {
        let total_chunks = chunks.len();
        let total_characters = chunks.iter().map(|c| c.size).sum::<usize>();

        let sources = chunks
            .iter()
            .map(|c| c.source.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        DocumentStats {
            total_chunks,
            total_characters,
            average_chunk_size: total_characters.checked_div(total_chunks).unwrap_or(0),
            num_sources: sources.len(),
            sources,
        }
    }
}

/// Character offsets of `chunks` in `text`. Chunks must be slices of `text`.
fn char_offsets(text: &str, chunks: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(chunks.len());

    // (byte, char) position of the previous chunk
    let mut last = (0, 0);

    for chunk in chunks {
        let byte = chunx::offset_of(text, chunk).unwrap_or(0);

        let chars = if byte >= last.0 {
            last.1 + text[last.0..byte].chars().count()
        } else {
            text[..byte].chars().count()
        };

        last = (byte, chars);
        offsets.push(chars);
    }

    offsets
}
