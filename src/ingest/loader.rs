//! Source document loading

use super::IngestError;
use crate::search::Document;
use ignore::WalkBuilder;
use std::path::Path;

/// Extensions picked up by the loader, compared case-insensitively
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["json", "markdown", "md", "txt"];

/// Load every supported file under `dir`, in sorted path order.
///
/// Hidden and ignored files are included. Sources are recorded relative to
/// `base` when `dir` lies inside it.
pub fn load_documents(dir: &Path, base: &Path) -> Result<Vec<Document>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::MissingDirectory(dir.to_path_buf()));
    }

    let mut documents = Vec::new();
    for entry in WalkBuilder::new(dir)
        .standard_filters(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build()
    {
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) || !is_supported(entry.path()) {
            continue;
        }

        let path = entry.path();
        let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = decode(path, &bytes);
        let content = render(path, &raw);
        let content = content.trim();
        if content.is_empty() {
            tracing::warn!(path = %path.display(), "Skipping empty file");
            continue;
        }

        let source = path.strip_prefix(base).unwrap_or(path);
        documents.push(Document::new(content, source.to_string_lossy()));
    }

    if documents.is_empty() {
        return Err(IngestError::NoDocuments {
            dir: dir.to_path_buf(),
            supported: SUPPORTED_EXTENSIONS.join(", "),
        });
    }

    tracing::info!(dir = %dir.display(), count = documents.len(), "Loaded documents");
    Ok(documents)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// UTF-8 text with invalid byte sequences dropped
fn decode(path: &Path, bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0usize;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    if dropped > 0 {
        tracing::warn!(path = %path.display(), dropped, "Ignoring invalid UTF-8 bytes");
    }
    text
}

/// JSON files are re-rendered pretty-printed in source key order; anything
/// unparsable is kept as is
fn render(path: &Path, raw: &str) -> String {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return raw.to_string();
    }

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Invalid JSON, keeping raw text");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(docs.join("hr")).unwrap();
        fs::write(docs.join("hr/leave.md"), "# Leave\n\nAnnual leave is 15 days.\n").unwrap();
        fs::write(docs.join("b.TXT"), "  plain text  ").unwrap();
        fs::write(docs.join("a.json"), r#"{"policy":"remote","days":2}"#).unwrap();
        fs::write(docs.join("broken.json"), "{not json").unwrap();
        fs::write(docs.join("empty.md"), "   \n").unwrap();
        fs::write(docs.join("image.png"), [0u8, 1, 2]).unwrap();
        temp
    }

    #[test]
    fn test_loads_supported_files_in_sorted_order() {
        let temp = fixture();
        let docs = load_documents(&temp.path().join("docs"), temp.path()).unwrap();

        let sources: Vec<&str> = docs.iter().map(|d| d.metadata.source.as_str()).collect();
        assert_eq!(
            sources,
            vec!["docs/a.json", "docs/b.TXT", "docs/broken.json", "docs/hr/leave.md"]
        );
        assert_eq!(docs[1].content, "plain text");
        assert_eq!(docs[3].metadata.filename, "leave.md");
    }

    #[test]
    fn test_json_pretty_printed_and_invalid_kept() {
        let temp = fixture();
        let docs = load_documents(&temp.path().join("docs"), temp.path()).unwrap();

        assert_eq!(docs[0].content, "{\n  \"policy\": \"remote\",\n  \"days\": 2\n}");
        assert_eq!(docs[2].content, "{not json");
    }

    #[test]
    fn test_invalid_utf8_bytes_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("good.txt"), "annual leave").unwrap();
        fs::write(
            temp.path().join("legacy.txt"),
            [0xC8, 0xDE, 0xB0, 0xA1, 0x20, 0x78],
        )
        .unwrap();

        let docs = load_documents(temp.path(), temp.path()).unwrap();

        let sources: Vec<&str> = docs.iter().map(|d| d.metadata.source.as_str()).collect();
        assert_eq!(sources, vec!["good.txt", "legacy.txt"]);
        assert_eq!(docs[1].content, "\u{7b0} x");
    }

    #[test]
    fn test_hidden_and_gitignored_files_loaded() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".policies")).unwrap();
        fs::create_dir_all(temp.path().join("drafts")).unwrap();
        fs::write(temp.path().join(".gitignore"), "drafts/\n").unwrap();
        fs::write(temp.path().join(".policies/leave.md"), "leave").unwrap();
        fs::write(temp.path().join("drafts/remote.md"), "remote").unwrap();
        fs::write(temp.path().join("visible.md"), "visible").unwrap();

        let docs = load_documents(temp.path(), temp.path()).unwrap();

        let sources: Vec<&str> = docs.iter().map(|d| d.metadata.source.as_str()).collect();
        assert_eq!(
            sources,
            vec![".policies/leave.md", "drafts/remote.md", "visible.md"]
        );
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let err = load_documents(&temp.path().join("nope"), temp.path()).unwrap_err();
        assert!(matches!(err, IngestError::MissingDirectory(_)));
    }

    #[test]
    fn test_no_documents() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("empty.txt"), "").unwrap();
        fs::write(temp.path().join("data.csv"), "a,b").unwrap();
        let err = load_documents(temp.path(), temp.path()).unwrap_err();
        assert!(matches!(err, IngestError::NoDocuments { .. }));
    }
}
