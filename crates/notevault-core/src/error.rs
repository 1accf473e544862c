//! Error types for vault core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these to
//! user-friendly messages. The security-relevant distinction the rest of the
//! crate leans on: [`VaultError::Authentication`] means wrong key material or
//! tampering, [`VaultError::Corruption`] means the ciphertext authenticated
//! but its payload is damaged. The two must never be collapsed.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Wrong passphrase, or a record's authentication tag failed to verify
    #[error("Authentication failed: wrong passphrase or tampered record")]
    Authentication,

    /// Ciphertext authenticated but the payload is unparsable or mismatched
    #[error("Corrupted record: {0}")]
    Corruption(String),

    /// Caller-supplied input violates a precondition
    #[error("Validation error: {0}")]
    Validation(String),

    /// No vault has been initialized yet
    #[error("No vault exists yet")]
    VaultNotFound,

    /// Bootstrap attempted on an already-initialized vault
    #[error("Vault is already initialized")]
    AlreadyInitialized,

    /// Repository operation attempted without an unlocked session
    #[error("Vault is locked")]
    Locked,

    /// Note not found by ID
    #[error("Note not found: {0}")]
    NoteNotFound(Uuid),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Key derivation or cipher setup failure
    #[error("Crypto error: {0}")]
    Crypto(String),
}
