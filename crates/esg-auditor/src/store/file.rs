use super::{KeyValueStore, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Store persisted as one JSON object of string values on disk.
///
/// Every write re-reads the document, applies the change and rewrites it
/// through a sibling temp file, so an interrupted write never leaves a
/// half-written document behind. A document that cannot be parsed is moved
/// to a `.corrupt` sibling before the store starts over from empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

type Document = BTreeMap<String, String>;

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.lock
            .lock()
            .map_err(|_| StoreError::Unavailable("file store mutex poisoned".to_string()))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// First `.corrupt`, `.corrupt.1`, ... name not already taken.
    fn quarantine_path(&self) -> PathBuf {
        let first = self.sibling(".corrupt");
        if !first.exists() {
            return first;
        }
        (1u32..)
            .map(|n| self.sibling(&format!(".corrupt.{n}")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }

    fn read_document(&self) -> Result<Document, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        if raw.trim().is_empty() {
            return Ok(Document::new());
        }

        match serde_json::from_str(&raw) {
            Ok(document) => Ok(document),
            Err(err) => {
                let quarantine = self.quarantine_path();
                fs::rename(&self.path, &quarantine).map_err(|source| self.io_error(source))?;
                warn!(
                    path = %self.path.display(),
                    moved_to = %quarantine.display(),
                    error = %err,
                    "store document is unreadable; starting from an empty store"
                );
                Ok(Document::new())
            }
        }
    }

    fn write_document(&self, document: &Document) -> Result<(), StoreError> {
        let encoded =
            serde_json::to_string_pretty(document).map_err(|source| StoreError::Encode {
                key: self.path.display().to_string(),
                source,
            })?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let staging = self.sibling(".tmp");

        fs::write(&staging, encoded).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), keys = document.len(), "store document written");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.guard()?;
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        self.write_document(&document)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.guard()?;
        let mut document = self.read_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}
