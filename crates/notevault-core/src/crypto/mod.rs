//! Cryptographic primitives: key derivation, passphrase rules, and the
//! per-record authenticated codec.

pub mod codec;
pub mod key;
pub mod passphrase;

pub use codec::{decrypt_record, encrypt_note, NONCE_LENGTH, SALT_LENGTH};
pub use key::{derive_key, DerivedKey, KEY_LENGTH};
pub use passphrase::validate_passphrase;
