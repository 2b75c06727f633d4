use crate::document::Document;
use crate::error::{DocumentError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Handle to the document file.
///
/// The handle holds no parsed state: every call goes back to storage, and
/// every write replaces the whole file.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads and parses the document, or `None` when the file does not exist.
    pub fn load(&self) -> Result<Option<Document>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(DocumentError::IoError(err)),
        };
        Document::from_slice(&bytes)
            .map(Some)
            .map_err(|err| match err {
                DocumentError::FormatError(msg) => {
                    DocumentError::FormatError(format!("{}: {msg}", self.path.display()))
                }
                other => other,
            })
    }

    /// Loads the document, creating and persisting the seeded one if missing.
    pub fn load_or_create(&self) -> Result<Document> {
        if let Some(doc) = self.load()? {
            return Ok(doc);
        }
        log::info!("Creating shopping list document at {:?}", self.path);
        let doc = Document::seeded();
        self.save(&doc)?;
        Ok(doc)
    }

    /// Makes sure a document file exists without parsing an existing one.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.exists() {
            return Ok(());
        }
        self.load_or_create().map(|_| ())
    }

    /// Writes the whole document through a temp file and a rename, so readers
    /// see either the old or the new content.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let bytes = doc.to_vec_pretty()?;
        self.ensure_parent()?;

        let tmp = temp_sibling(&self.path);
        let written = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&tmp, &self.path)
        })();

        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            return Err(DocumentError::IoError(err));
        }
        log::debug!("Saved document {:?} ({} bytes)", self.path, bytes.len());
        Ok(())
    }

    pub(crate) fn ensure_parent(&self) -> std::io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

/// Unique sibling of `path`, so the final rename stays on one filesystem.
pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let suffix = format!(".tmp.{}", Uuid::new_v4());
    let name = path
        .file_name()
        .map(|name| format!("{}{suffix}", name.to_string_lossy()))
        .unwrap_or(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Section;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> DocumentStore {
        DocumentStore::new(tmp.path().join("nested").join("ShoppingList.json"))
    }

    #[test]
    fn load_returns_none_for_missing_file() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.load().unwrap().is_none());
        assert!(!store.exists());
    }

    #[test]
    fn load_or_create_persists_seeded_document() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);

        let created = store.load_or_create().unwrap();
        assert!(store.exists());
        assert_eq!(created, Document::seeded());
        assert_eq!(store.load().unwrap(), Some(Document::seeded()));
    }

    #[test]
    fn save_replaces_content_and_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let mut doc = store.load_or_create().unwrap();
        doc.ensure_section(Section::Products).push(json!({"Id": "a", "Name": "Milk"}));
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), Some(doc));
        let entries: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1, "unexpected files: {entries:?}");
    }

    #[test]
    fn corrupt_document_is_a_format_error() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.ensure_parent().unwrap();
        fs::write(store.path(), b"{ not json").unwrap();

        let err = store.load_or_create().unwrap_err();
        assert!(err.is_format(), "unexpected error: {err:?}");
        assert_eq!(fs::read(store.path()).unwrap(), b"{ not json");
    }

    #[test]
    fn ensure_exists_does_not_parse_existing_file() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.ensure_parent().unwrap();
        fs::write(store.path(), b"garbage").unwrap();
        store.ensure_exists().unwrap();
        assert_eq!(fs::read(store.path()).unwrap(), b"garbage");
    }

    #[test]
    fn unreadable_location_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        // A directory where the file should be.
        let store = DocumentStore::new(tmp.path());
        let err = store.load_or_create().unwrap_err();
        assert!(matches!(err, DocumentError::IoError(_)), "{err:?}");
    }
}
