//! # NoteVault Core
//!
//! Core library for NoteVault - a single-user, local-only encrypted note
//! vault. Notes are stored at rest under a key derived from a passphrase and
//! only ever exist in cleartext in memory while the vault is unlocked.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation and per-record XChaCha20-Poly1305
//!   encryption
//! - **auth**: passphrase bootstrap, verification, and reset
//! - **store**: storage contracts plus SQLite and in-memory backends
//! - **repository**: the session-scoped decrypted view and its mutations
//! - **vault**: facade tying the above together over one store

pub mod auth;
pub mod crypto;
pub mod error;
pub mod note;
pub mod repository;
pub mod store;
pub mod vault;

pub use auth::PassphraseAuthenticator;
pub use error::{Result, VaultError};
pub use note::{Note, NoteDraft, NoteFilter};
pub use repository::{HydrateOutcome, NoteRepository, SkippedRecord};
pub use vault::Vault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
