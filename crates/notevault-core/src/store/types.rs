//! Data types persisted by the store layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One note, encrypted at rest.
///
/// Decrypting with the correct key yields exactly the note whose id matches
/// `id`, or fails with an authentication error, never a different note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    /// Id of the note this record encrypts
    pub id: Uuid,

    /// Per-record random nonce, fresh for every encryption, never reused
    pub nonce: Vec<u8>,

    /// AEAD output: ciphertext with the authentication tag appended
    pub ciphertext: Vec<u8>,

    /// Mirror of the note's `updated_at`, for store-level bookkeeping
    /// without decryption
    pub updated_at: DateTime<Utc>,
}

/// The persisted passphrase verifier, created once per vault lifetime at
/// first unlock and destroyed only by an explicit vault reset.
///
/// `key_salt` feeds the encryption-key KDF; `verifier` is a PHC-format
/// Argon2id hash carrying its own independent salt, so neither value can be
/// repurposed to decrypt records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultVerifier {
    /// Random salt for the encryption-key derivation, fixed for the vault's
    /// lifetime
    pub key_salt: Vec<u8>,

    /// PHC-format passphrase hash used for unlock verification only
    pub verifier: String,
}
