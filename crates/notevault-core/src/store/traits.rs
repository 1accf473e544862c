//! Storage contracts for encrypted records and the vault verifier.
//!
//! The repository and authenticator only ever see these traits, so backends
//! can be swapped without touching the core logic. Implementations must keep
//! every stored value opaque: records arrive already encrypted, and the
//! verifier hash is useless for decrypting anything.

use uuid::Uuid;

use super::types::{EncryptedRecord, VaultVerifier};
use crate::error::Result;

/// Persistent key-value store of encrypted records, keyed by note id.
///
/// Only per-call atomicity is guaranteed; callers must not assume cross-call
/// transactions.
pub trait RecordStore: Send + Sync {
    /// Retrieve every stored record, in no particular order.
    fn get_all(&self) -> Result<Vec<EncryptedRecord>>;

    /// Insert or replace the record with the same id.
    fn put(&self, record: &EncryptedRecord) -> Result<()>;

    /// Delete the record with this id. Deleting an absent id is a no-op.
    fn delete(&self, id: &Uuid) -> Result<()>;

    /// Delete every record.
    fn clear(&self) -> Result<()>;
}

/// Storage for the single vault verifier, readable/writable/deletable as one
/// unit and independent of the record rows.
pub trait VerifierStore: Send + Sync {
    /// Load the verifier, or `None` when the vault has never been
    /// bootstrapped.
    fn load_verifier(&self) -> Result<Option<VaultVerifier>>;

    /// Persist the verifier, replacing any previous one.
    fn save_verifier(&self, verifier: &VaultVerifier) -> Result<()>;

    /// Delete the verifier. Irreversible; absent verifier is a no-op.
    fn delete_verifier(&self) -> Result<()>;
}
