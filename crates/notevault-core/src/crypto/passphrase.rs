//! Passphrase validation.
//!
//! Enforced at bootstrap only; an existing vault opens with whatever
//! passphrase created it.

use crate::error::{Result, VaultError};

/// Minimum passphrase length in characters.
const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Validate that a passphrase meets minimum requirements: at least 8
/// characters and not blank.
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(VaultError::Validation(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    if passphrase.len() < MIN_PASSPHRASE_LENGTH {
        return Err(VaultError::Validation(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH,
            passphrase.len()
        )));
    }

    Ok(())
}
