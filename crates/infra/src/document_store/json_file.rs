use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use stockroom_inventory::InventoryDocument;

use super::r#trait::{
    DefaultReason, DocumentStore, LoadOutcome, PersistenceError, decode_or_default, encode,
};

/// Well-known relative location of the data file.
pub const DEFAULT_DATA_FILE: &str = "depo_data.json";

/// Single JSON file on local disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> LoadOutcome {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("no inventory document at {:?}, starting from seed data", self.path);
                return LoadOutcome::defaulted(DefaultReason::Missing);
            }
            Err(e) => {
                tracing::warn!("failed to read inventory document at {:?}: {e}", self.path);
                return LoadOutcome::defaulted(DefaultReason::Unreadable(e.to_string()));
            }
        };

        let outcome = decode_or_default(&text, &self.path.to_string_lossy());
        if !outcome.used_defaults() {
            tracing::debug!("loaded inventory document from {:?}", self.path);
        }
        outcome
    }

    fn save(&self, document: &InventoryDocument) -> Result<(), PersistenceError> {
        let text = encode(document)?;
        std::fs::write(&self.path, text).map_err(|source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("saved inventory document to {:?}", self.path);
        Ok(())
    }
}
