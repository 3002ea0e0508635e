use std::{
    fs,
    path::{Path, PathBuf},
};

use core_types::config::DEFAULT_STATE_DIR;

use crate::error::Result;

pub const SNAPSHOT_FILE: &str = "simulation-state.json";

#[derive(Clone, Debug)]
pub struct LedgerConfig {
    pub state_dir: PathBuf,
}

impl LedgerConfig {
    pub fn new(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.state_dir.join(SNAPSHOT_FILE)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        if !self.state_dir.exists() {
            fs::create_dir_all(&self.state_dir)?;
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_STATE_DIR))
    }
}
