use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::warn;
use parking_lot::Mutex;

use crate::{error::StorageError, reconcile::PersistedState, state::SimulationState};

/// Load/save hooks for the `{config, orders, pool}` snapshot.
pub trait StateStore: Send + Sync {
    /// Prior state, or `None` when there is none or it cannot be read.
    fn load(&self) -> Option<PersistedState>;
    fn save(&self, state: &SimulationState) -> Result<(), StorageError>;
}

impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn load(&self) -> Option<PersistedState> {
        (**self).load()
    }

    fn save(&self, state: &SimulationState) -> Result<(), StorageError> {
        (**self).save(state)
    }
}

/// Snapshot kept as a pretty-printed json file.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Option<PersistedState> {
        if !self.path.exists() {
            return None;
        }
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("failed to read snapshot {:?}: {}", self.path, err);
                return None;
            }
        };
        if bytes.is_empty() {
            return None;
        }
        match serde_json::from_slice(&bytes) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!("ignoring unreadable snapshot {:?}: {}", self.path, err);
                None
            }
        }
    }

    fn save(&self, state: &SimulationState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }
        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|err| self.io_error(err))?;
        fs::rename(&tmp, &self.path).map_err(|err| self.io_error(err))?;
        Ok(())
    }
}

/// In-process snapshot holder; nothing touches disk.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    snapshot: Mutex<Option<String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `json` as the stored snapshot.
    pub fn with_snapshot(json: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(json.into())),
        }
    }

    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.lock().clone()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Option<PersistedState> {
        let guard = self.snapshot.lock();
        let json = guard.as_deref()?;
        match serde_json::from_str(json) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!("ignoring unreadable in-memory snapshot: {}", err);
                None
            }
        }
    }

    fn save(&self, state: &SimulationState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        *self.snapshot.lock() = Some(json);
        Ok(())
    }
}
