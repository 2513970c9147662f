//! Document search backends used by the retrieval tools

mod index;

pub use index::IndexClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A retrievable unit of text with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Path relative to the ingestion root; the index key is derived from it
    pub source: String,
    pub filename: String,
    /// Corpus the document belongs to ("HR", "wiki", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let filename = source.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source,
                filename,
                intent: None,
            },
        }
    }

    #[must_use]
    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.metadata.intent = Some(intent.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search index returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid index url: {0}")]
    InvalidUrl(String),
}

/// Query side of a document index
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    /// Return up to `topk` documents for `query` within the `intent` corpus.
    ///
    /// `alpha` weighs keyword relevance against semantic relevance; backends
    /// without a semantic component may use it only as a scoring hint.
    async fn search(
        &self,
        intent: &str,
        query: &str,
        topk: usize,
        alpha: f64,
    ) -> Result<Vec<Document>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_source() {
        let doc = Document::new("body", "docs/hr/leave.md");
        assert_eq!(doc.metadata.filename, "leave.md");
        assert_eq!(doc.metadata.source, "docs/hr/leave.md");
    }

    #[test]
    fn test_intent_skipped_when_absent() {
        let value = serde_json::to_value(Document::new("x", "a.txt")).unwrap();
        assert!(value["metadata"].get("intent").is_none());
        let value = serde_json::to_value(Document::new("x", "a.txt").with_intent("HR")).unwrap();
        assert_eq!(value["metadata"]["intent"], "HR");
    }
}
