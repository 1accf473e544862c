//! Passphrase bootstrap and verification.
//!
//! The verifier is a PHC-format Argon2id hash with its own random salt,
//! persisted separately from the notes. Verification never touches a note:
//! a wrong passphrase is rejected before any record is decrypted. The
//! encryption key is derived from an independent `key_salt`, so verifier
//! material can never stand in for the key and vice versa.

use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier,
    SaltString,
};

use crate::crypto::codec::generate_salt;
use crate::crypto::key::{argon2_context, derive_key, DerivedKey};
use crate::crypto::passphrase::validate_passphrase;
use crate::error::{Result, VaultError};
use crate::store::{VaultVerifier, VerifierStore};

/// Owns the vault's verifier record: bootstraps it on first use, verifies
/// subsequent unlock attempts.
pub struct PassphraseAuthenticator {
    verifiers: Arc<dyn VerifierStore>,
}

impl PassphraseAuthenticator {
    pub fn new(verifiers: Arc<dyn VerifierStore>) -> Self {
        Self { verifiers }
    }

    /// Whether a verifier exists, i.e. the vault has been bootstrapped.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.verifiers.load_verifier()?.is_some())
    }

    /// First-use setup: persist a fresh verifier and return the session key.
    ///
    /// Fails with [`VaultError::AlreadyInitialized`] when a verifier already
    /// exists; bootstrap never replaces an existing vault.
    pub fn bootstrap(&self, passphrase: &str) -> Result<DerivedKey> {
        if self.verifiers.load_verifier()?.is_some() {
            return Err(VaultError::AlreadyInitialized);
        }
        validate_passphrase(passphrase)?;

        let key_salt = generate_salt();
        let phc_salt = SaltString::generate(&mut OsRng);
        let verifier_hash = argon2_context()?
            .hash_password(passphrase.as_bytes(), &phc_salt)
            .map_err(|e| VaultError::Crypto(format!("Verifier hash failed: {}", e)))?
            .to_string();

        self.verifiers.save_verifier(&VaultVerifier {
            key_salt: key_salt.to_vec(),
            verifier: verifier_hash,
        })?;

        derive_key(passphrase, &key_salt)
    }

    /// Check the passphrase against the stored verifier and return the
    /// session key.
    ///
    /// Fails with [`VaultError::VaultNotFound`] when no verifier exists
    /// (reported distinctly from a wrong passphrase) and with
    /// [`VaultError::Authentication`] on mismatch. The underlying comparison
    /// is constant-time.
    pub fn verify(&self, passphrase: &str) -> Result<DerivedKey> {
        let verifier = self
            .verifiers
            .load_verifier()?
            .ok_or(VaultError::VaultNotFound)?;

        let parsed = PasswordHash::new(&verifier.verifier)
            .map_err(|e| VaultError::Corruption(format!("Invalid verifier hash: {}", e)))?;
        match argon2_context()?.verify_password(passphrase.as_bytes(), &parsed) {
            Ok(()) => {}
            Err(PasswordHashError::Password) => return Err(VaultError::Authentication),
            Err(e) => {
                return Err(VaultError::Corruption(format!(
                    "Verifier check failed: {}",
                    e
                )))
            }
        }

        derive_key(passphrase, &verifier.key_salt)
    }

    /// Delete the verifier. Irreversible; the caller is responsible for
    /// clearing the encrypted records alongside it.
    pub fn reset(&self) -> Result<()> {
        self.verifiers.delete_verifier()
    }
}
