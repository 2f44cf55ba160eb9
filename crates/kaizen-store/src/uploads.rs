// ABOUTME: Local-disk upload store that writes files by name and pulls text out of text-like ones.
// ABOUTME: Same-named uploads overwrite each other; only the final path component of a name is used.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// File extensions (lowercase, without the dot) whose contents are decoded as
/// UTF-8 and handed to the analysis prompt.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "csv", "tsv", "json", "log", "xml", "yaml", "yml",
];

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file name: {0:?}")]
    InvalidFilename(String),
}

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUpload {
    pub filename: String,
    pub size: u64,
    pub path: String,
    pub has_content: bool,
    /// Decoded text, present exactly when `has_content` is true.
    #[serde(skip)]
    pub content: Option<String>,
}

/// True when `filename` carries one of [`TEXT_EXTENSIONS`] (case-insensitive).
pub fn is_text_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TEXT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Reduce a client-supplied name to its final path component so uploads can
/// never land outside the store directory.
fn sanitize_filename(raw: &str) -> Result<String, UploadError> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(UploadError::InvalidFilename(raw.to_string()));
    }
    Ok(name.to_string())
}

/// Upload directory on local disk. Nothing is indexed or cleaned up.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory (and parents) if missing.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write `bytes` under `filename`, replacing any earlier upload of the
    /// same name.
    ///
    /// Text is extracted when the extension is text-like and the bytes are
    /// valid UTF-8. An empty text file yields empty content. Anything else is
    /// stored without content.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<StoredUpload, UploadError> {
        let name = sanitize_filename(filename)?;
        self.ensure_dir().await?;

        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes).await?;

        let content = if is_text_file(&name) {
            match std::str::from_utf8(bytes) {
                Ok(text) => Some(text.to_string()),
                Err(e) => {
                    tracing::warn!(
                        file = %name,
                        error = %e,
                        "text upload is not valid UTF-8, storing without content"
                    );
                    None
                }
            }
        } else {
            None
        };

        tracing::info!(
            file = %name,
            size = bytes.len(),
            has_content = content.is_some(),
            "stored upload"
        );

        Ok(StoredUpload {
            filename: name,
            size: bytes.len() as u64,
            path: path.display().to_string(),
            has_content: content.is_some(),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, UploadStore) {
        let tmp = TempDir::new().unwrap();
        let store = UploadStore::new(tmp.path().join("uploads"));
        (tmp, store)
    }

    #[test]
    fn text_extensions_are_case_insensitive() {
        assert!(is_text_file("notes.txt"));
        assert!(is_text_file("README.MD"));
        assert!(is_text_file("fleet.Yaml"));
        assert!(!is_text_file("logo.png"));
        assert!(!is_text_file("Makefile"));
        assert!(!is_text_file("archive.tar.gz"));
    }

    #[test]
    fn sanitize_keeps_final_component() {
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\report.csv").unwrap(), "report.csv");
        assert_eq!(sanitize_filename("plain.txt").unwrap(), "plain.txt");
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("dir/").is_err());
        assert!(sanitize_filename("..").is_err());
    }

    #[tokio::test]
    async fn text_file_is_stored_with_content() {
        let (_tmp, store) = store();

        let saved = store.save("notes.txt", b"hello").await.unwrap();

        assert_eq!(saved.filename, "notes.txt");
        assert_eq!(saved.size, 5);
        assert!(saved.has_content);
        assert_eq!(saved.content.as_deref(), Some("hello"));
        assert_eq!(std::fs::read(store.dir().join("notes.txt")).unwrap(), b"hello");
        assert!(saved.path.ends_with("notes.txt"));
    }

    #[tokio::test]
    async fn binary_file_is_stored_without_content() {
        let (_tmp, store) = store();
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

        let saved = store.save("logo.png", &png).await.unwrap();

        assert!(!saved.has_content);
        assert!(saved.content.is_none());
        assert_eq!(saved.size, 8);
        assert!(store.dir().join("logo.png").exists());
    }

    #[tokio::test]
    async fn invalid_utf8_text_file_has_no_content() {
        let (_tmp, store) = store();
        let saved = store.save("data.csv", &[0xff, 0xfe, 0x00]).await.unwrap();
        assert!(!saved.has_content);
    }

    #[tokio::test]
    async fn empty_text_file_has_empty_content() {
        let (_tmp, store) = store();
        let saved = store.save("empty.md", b"").await.unwrap();
        assert!(saved.has_content);
        assert_eq!(saved.content.as_deref(), Some(""));
        assert_eq!(saved.size, 0);
    }

    #[tokio::test]
    async fn same_name_overwrites() {
        let (_tmp, store) = store();

        store.save("plan.md", b"first draft").await.unwrap();
        let saved = store.save("plan.md", b"final").await.unwrap();

        assert_eq!(saved.content.as_deref(), Some("final"));
        assert_eq!(
            std::fs::read_to_string(store.dir().join("plan.md")).unwrap(),
            "final"
        );
    }

    #[tokio::test]
    async fn traversal_names_stay_inside_store() {
        let (tmp, store) = store();

        let saved = store.save("../escape.txt", b"x").await.unwrap();

        assert_eq!(saved.filename, "escape.txt");
        assert!(store.dir().join("escape.txt").exists());
        assert!(!tmp.path().join("escape.txt").exists());
    }

    #[test]
    fn serialized_upload_omits_content() {
        let upload = StoredUpload {
            filename: "a.txt".to_string(),
            size: 1,
            path: "uploads/a.txt".to_string(),
            has_content: true,
            content: Some("a".to_string()),
        };
        let json = serde_json::to_value(&upload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "filename": "a.txt",
                "size": 1,
                "path": "uploads/a.txt",
                "has_content": true
            })
        );
    }
}
