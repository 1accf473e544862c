//! Storage layer: contracts plus the SQLite and in-memory backends.

pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{RecordStore, VerifierStore};
pub use types::{EncryptedRecord, VaultVerifier};
