//! Per-record authenticated encryption.
//!
//! Each note is serialized to canonical JSON and sealed with
//! XChaCha20-Poly1305 under a fresh random 24-byte nonce. The note's UUID is
//! bound as associated data, so moving one record's ciphertext under another
//! id fails tag verification instead of decrypting to the wrong note.

use chacha20poly1305::aead::{Aead, KeyInit, OsRng, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::RngCore;

use crate::crypto::key::DerivedKey;
use crate::error::{Result, VaultError};
use crate::note::Note;
use crate::store::types::EncryptedRecord;

/// XChaCha20-Poly1305 nonce length in bytes.
pub const NONCE_LENGTH: usize = 24;

/// Vault key salt length in bytes.
pub const SALT_LENGTH: usize = 32;

/// Generate a fresh random nonce for one encryption operation.
pub(crate) fn generate_nonce() -> [u8; NONCE_LENGTH] {
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Generate the vault's key salt, once, at bootstrap.
pub(crate) fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Encrypt one note into an authenticated record.
///
/// Side-effect free apart from drawing nonce randomness.
pub fn encrypt_note(note: &Note, key: &DerivedKey) -> Result<EncryptedRecord> {
    let plaintext = serde_json::to_vec(note)
        .map_err(|e| VaultError::Crypto(format!("Failed to serialize note: {}", e)))?;

    let nonce = generate_nonce();
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let ciphertext = cipher
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: &plaintext,
                aad: note.id.as_bytes().as_slice(),
            },
        )
        .map_err(|_| VaultError::Crypto("Encryption failed".to_string()))?;

    Ok(EncryptedRecord {
        id: note.id,
        nonce: nonce.to_vec(),
        ciphertext,
        updated_at: note.updated_at,
    })
}

/// Decrypt one record back into a note.
///
/// Tag mismatch (wrong key, tampering, or an id/ciphertext swap) fails with
/// [`VaultError::Authentication`] without interpreting any bytes. A payload
/// that authenticates but does not parse, or parses to a different id, fails
/// with [`VaultError::Corruption`].
pub fn decrypt_record(record: &EncryptedRecord, key: &DerivedKey) -> Result<Note> {
    let nonce: [u8; NONCE_LENGTH] = record.nonce.as_slice().try_into().map_err(|_| {
        VaultError::Corruption(format!("Invalid nonce length for record {}", record.id))
    })?;

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let plaintext = cipher
        .decrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: record.ciphertext.as_slice(),
                aad: record.id.as_bytes().as_slice(),
            },
        )
        .map_err(|_| VaultError::Authentication)?;

    let note: Note = serde_json::from_slice(&plaintext)
        .map_err(|e| VaultError::Corruption(format!("Unparsable note payload: {}", e)))?;

    if note.id != record.id {
        return Err(VaultError::Corruption(format!(
            "Record {} decrypted to note {}",
            record.id, note.id
        )));
    }

    Ok(note)
}
