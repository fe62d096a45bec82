//! JSON File Repository
//!
//! Backing-file implementation of [`PositionRepository`].

use crate::domain::entities::position::PositionRecord;
use crate::domain::errors::StoreError;
use crate::domain::repositories::position_repository::{PositionRepository, StoreResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

/// Record list stored as a pretty-printed JSON array in a single file.
///
/// The first successful `load` is cached; later loads are served from the
/// cache until `invalidate` is called. `save` refreshes the cache.
pub struct JsonFileRepository {
    path: PathBuf,
    cache: Mutex<Option<Vec<PositionRecord>>>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_from_disk(&self) -> StoreResult<Vec<PositionRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No backing file at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                error!("Failed to read {}: {}", self.path.display(), source);
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Sibling file the new content is written to before it replaces the
    /// backing file.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        error!("I/O error on {}: {}", path.display(), source);
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn cache(&self) -> MutexGuard<'_, Option<Vec<PositionRecord>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PositionRepository for JsonFileRepository {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> StoreResult<Vec<PositionRecord>> {
        let mut cache = self.cache();
        if let Some(records) = cache.as_ref() {
            debug!("Serving {} records from cache", records.len());
            return Ok(records.clone());
        }

        let records = self.read_from_disk()?;
        info!("Loaded {} records from {}", records.len(), self.path.display());
        *cache = Some(records.clone());
        Ok(records)
    }

    fn save(&self, records: &[PositionRecord]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, json.as_bytes()).map_err(|e| Self::io_error(&temp_path, e))?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(Self::io_error(&self.path, e));
        }

        *self.cache() = Some(records.to_vec());
        debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn invalidate(&self) {
        *self.cache() = None;
    }
}
