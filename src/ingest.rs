//! Document ingestion: load, chunk and upsert into the search index

mod loader;
mod splitter;

pub use loader::{load_documents, SUPPORTED_EXTENSIONS};
pub use splitter::TextSplitter;

use crate::search::{Document, IndexClient, SearchError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("document directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("no readable documents found in {}; supported extensions: {supported}", dir.display())]
    NoDocuments { dir: PathBuf, supported: String },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("directory walk failed: {0}")]
    Walk(#[from] ignore::Error),
    #[error("chunk overlap {chunk_overlap} must be smaller than chunk size {chunk_size}")]
    InvalidChunking {
        chunk_size: usize,
        chunk_overlap: usize,
    },
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Counts from one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub uploaded: usize,
}

/// Split documents into index entries keyed by `"{source}#{ordinal}"`
pub fn prepare_chunks(
    documents: &[Document],
    splitter: &TextSplitter,
    intent: Option<&str>,
) -> Vec<(String, Document)> {
    let mut entries = Vec::new();
    for doc in documents {
        for (ordinal, chunk) in splitter.split(&doc.content).into_iter().enumerate() {
            let mut metadata = doc.metadata.clone();
            if let Some(intent) = intent {
                metadata.intent = Some(intent.to_string());
            }
            let key = format!("{}#{ordinal}", metadata.source);
            entries.push((
                key,
                Document {
                    content: chunk,
                    metadata,
                },
            ));
        }
    }
    entries
}

/// Load `docs_dir`, chunk it and write every chunk to the index.
///
/// With `dry_run` nothing is sent; the report still counts chunks.
pub async fn upsert(
    client: &IndexClient,
    docs_dir: &Path,
    base: &Path,
    intent: Option<&str>,
    dry_run: bool,
) -> Result<IngestReport, IngestError> {
    let documents = load_documents(docs_dir, base)?;
    let entries = prepare_chunks(&documents, &TextSplitter::default(), intent);

    let mut report = IngestReport {
        documents: documents.len(),
        chunks: entries.len(),
        uploaded: 0,
    };

    if dry_run {
        tracing::info!(
            documents = report.documents,
            chunks = report.chunks,
            "Dry run, skipping upload"
        );
        return Ok(report);
    }

    for (key, chunk) in &entries {
        client.upsert(key, chunk).await?;
        report.uploaded += 1;
        tracing::debug!(key = %key, "Upserted chunk");
    }

    tracing::info!(
        index = %client.index(),
        documents = report.documents,
        uploaded = report.uploaded,
        "Ingestion complete"
    );
    Ok(report)
}
