//! The configuration manager: one document, one backing file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

use crate::store::document;
use crate::store::error::{LoadError, LookupError, SaveError, StoreError};

/// Outcome of the most recent load, set or save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StoreState {
    Loaded,
    Failed { reason: String },
}

struct Inner {
    document: Value,
    state: StoreState,
}

/// Authoritative in-memory copy of the on-disk configuration.
///
/// Constructed once at startup and shared behind an `Arc`. Each `set` is
/// atomic with respect to other callers; a sequence of `set` calls followed
/// by `save` is not, and concurrent writers are last-write-wins.
///
/// `load` and `save` perform blocking file I/O.
pub struct ConfigManager {
    path: PathBuf,
    inner: RwLock<Inner>,
}

impl ConfigManager {
    /// Open the file at `path` and load it eagerly.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = read_document(&path).map_err(|source| StoreError::Load {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded configuration");

        Ok(Self {
            path,
            inner: RwLock::new(Inner {
                document,
                state: StoreState::Loaded,
            }),
        })
    }

    /// Backing file of this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> StoreState {
        self.read().state.clone()
    }

    /// Clone of the whole current document.
    pub fn document(&self) -> Value {
        self.read().document.clone()
    }

    /// Value at `key`, or `default` when the key is absent or an
    /// intermediate value is not a mapping.
    pub fn get(&self, key: &str, default: Value) -> Value {
        document::get(&self.read().document, key, default)
    }

    /// Typed `get`. A present value that does not convert to `T` is treated
    /// as not found.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        document::get_as(&self.read().document, key, default)
    }

    /// Strict lookup that tells absence apart from a type mismatch.
    pub fn lookup(&self, key: &str) -> Result<Value, LookupError> {
        document::lookup(&self.read().document, key).cloned()
    }

    /// Assign `value` at `key`. Not persisted until [`save`](Self::save).
    pub fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut inner = self.write();
        document::set(&mut inner.document, key, value)?;
        inner.state = StoreState::Loaded;
        tracing::debug!(key = %key, "Configuration value set");
        Ok(())
    }

    /// Re-read the backing file. On failure the current document is kept.
    pub fn load(&self) -> Result<(), StoreError> {
        match read_document(&self.path) {
            Ok(document) => {
                let mut inner = self.write();
                inner.document = document;
                inner.state = StoreState::Loaded;
                tracing::info!(path = %self.path.display(), "Loaded configuration");
                Ok(())
            }
            Err(source) => {
                let err = StoreError::Load {
                    path: self.path.clone(),
                    source,
                };
                tracing::error!(error = %err, "Keeping current configuration");
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub fn reload(&self) -> Result<(), StoreError> {
        self.load()
    }

    /// Serialize the whole document and overwrite the backing file.
    pub fn save(&self) -> Result<(), StoreError> {
        let text = serde_yaml::to_string(&self.read().document).map_err(SaveError::from);
        let result = text.and_then(|text| fs::write(&self.path, text).map_err(SaveError::from));

        match result {
            Ok(()) => {
                self.write().state = StoreState::Loaded;
                tracing::info!(path = %self.path.display(), "Saved configuration");
                Ok(())
            }
            Err(source) => {
                let err = StoreError::Save {
                    path: self.path.clone(),
                    source,
                };
                tracing::error!(error = %err, "Configuration not saved");
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn fail(&self, err: &StoreError) {
        self.write().state = StoreState::Failed {
            reason: err.to_string(),
        };
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_document(path: &Path) -> Result<Value, LoadError> {
    let content = fs::read_to_string(path)?;
    document::parse(&content)
}
