use crate::error::PersistenceError;
use crate::model::ModelCollection;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

/// Where a [`ProcessModelStore`](super::ProcessModelStore) keeps its collection.
///
/// Implementations move whole collections; the store never asks for partial
/// updates.
pub trait Persistence: Send + Sync {
    fn load(&self) -> Result<ModelCollection, PersistenceError>;
    fn save(&self, models: &ModelCollection) -> Result<(), PersistenceError>;
}

/// Keeps the collection as a pretty-printed JSON object in a single file.
///
/// Saves write a sibling temporary file and rename it over the target, so a
/// reader of the file sees either the old or the new collection. A missing
/// file loads as an empty collection.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Result<ModelCollection, PersistenceError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "model file missing, starting empty");
            return Ok(ModelCollection::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let models = serde_json::from_str(&content)?;
        Ok(models)
    }

    fn save(&self, models: &ModelCollection) -> Result<(), PersistenceError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let json = serde_json::to_string_pretty(models)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        debug!(path = %self.path.display(), models = models.len(), "saved model collection");
        Ok(())
    }
}

/// In-memory collection, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    models: Mutex<ModelCollection>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(models: ModelCollection) -> Self {
        Self {
            models: Mutex::new(models),
        }
    }

    /// A copy of what was last saved.
    pub fn snapshot(&self) -> ModelCollection {
        self.models
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<ModelCollection, PersistenceError> {
        Ok(self.snapshot())
    }

    fn save(&self, models: &ModelCollection) -> Result<(), PersistenceError> {
        *self
            .models
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = models.clone();
        Ok(())
    }
}
