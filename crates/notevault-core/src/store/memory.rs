//! In-memory storage, for tests and embedding.
//!
//! Same contracts as [`SqliteStore`](super::SqliteStore), nothing persisted.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use super::traits::{RecordStore, VerifierStore};
use super::types::{EncryptedRecord, VaultVerifier};
use crate::error::{Result, VaultError};

/// Volatile record and verifier store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Uuid, EncryptedRecord>>,
    verifier: Mutex<Option<VaultVerifier>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> VaultError {
    VaultError::Storage("Memory store poisoned".to_string())
}

impl RecordStore for MemoryStore {
    fn get_all(&self) -> Result<Vec<EncryptedRecord>> {
        let records = self.records.lock().map_err(|_| poisoned())?;
        Ok(records.values().cloned().collect())
    }

    fn put(&self, record: &EncryptedRecord) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| poisoned())?;
        records.insert(record.id, record.clone());
        Ok(())
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| poisoned())?;
        records.remove(id);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| poisoned())?;
        records.clear();
        Ok(())
    }
}

impl VerifierStore for MemoryStore {
    fn load_verifier(&self) -> Result<Option<VaultVerifier>> {
        let verifier = self.verifier.lock().map_err(|_| poisoned())?;
        Ok(verifier.clone())
    }

    fn save_verifier(&self, verifier: &VaultVerifier) -> Result<()> {
        let mut slot = self.verifier.lock().map_err(|_| poisoned())?;
        *slot = Some(verifier.clone());
        Ok(())
    }

    fn delete_verifier(&self) -> Result<()> {
        let mut slot = self.verifier.lock().map_err(|_| poisoned())?;
        *slot = None;
        Ok(())
    }
}
