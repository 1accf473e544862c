//! Key derivation using Argon2id.
//!
//! The session key is derived from the passphrase and the vault's fixed
//! `key_salt` using Argon2id, which is memory-hard and resistant to GPU-based
//! attacks. The passphrase is never used directly as key material.

use argon2::Argon2;
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, VaultError};

/// Argon2id parameters.
///
/// - Memory: 64 MB
/// - Iterations: 3
/// - Parallelism: 1 (single-threaded session)
pub(crate) const ARGON2_MEMORY_KB: u32 = 64 * 1024;
pub(crate) const ARGON2_ITERATIONS: u32 = 3;
pub(crate) const ARGON2_PARALLELISM: u32 = 1;

/// Length of derived key in bytes (256 bits for XChaCha20-Poly1305).
pub const KEY_LENGTH: usize = 32;

/// Minimum accepted salt length in bytes.
const MIN_SALT_LENGTH: usize = 16;

/// The symmetric session key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped; locking the vault drops
/// the only copy.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Use only for immediate cipher construction.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

pub(crate) fn argon2_context() -> Result<Argon2<'static>> {
    let params = argon2::Params::new(
        ARGON2_MEMORY_KB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| VaultError::Crypto(format!("Argon2 params: {}", e)))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Derive the encryption key from a passphrase and the vault's key salt.
///
/// Deterministic: the same passphrase and salt always produce the same key,
/// so a vault unlocks to the same key for its whole lifetime. Different salts
/// produce unrelated keys.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(VaultError::Validation(
            "Passphrase cannot be empty".to_string(),
        ));
    }
    if salt.len() < MIN_SALT_LENGTH {
        return Err(VaultError::Crypto(format!(
            "Key salt must be at least {} bytes",
            MIN_SALT_LENGTH
        )));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2_context()?
        .hash_password_into(passphrase.as_bytes(), salt, &mut key_bytes)
        .map_err(|e| VaultError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: &[u8] = b"unique-salt-1234567890123456";

    #[test]
    fn derivation_is_deterministic() {
        let key1 = derive_key("test-passphrase", SALT).unwrap();
        let key2 = derive_key("test-passphrase", SALT).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn different_salt_different_key() {
        let key1 = derive_key("test-passphrase", b"salt1-1234567890123456").unwrap();
        let key2 = derive_key("test-passphrase", b"salt2-1234567890123456").unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn different_passphrase_different_key() {
        let key1 = derive_key("passphrase-one", SALT).unwrap();
        let key2 = derive_key("passphrase-two", SALT).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn empty_passphrase_rejected() {
        assert!(derive_key("", SALT).is_err());
    }

    #[test]
    fn short_salt_rejected() {
        assert!(derive_key("test-passphrase", b"short").is_err());
    }

    #[test]
    fn debug_redacts_key_material() {
        let key = derive_key("test-passphrase", SALT).unwrap();
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));
        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
