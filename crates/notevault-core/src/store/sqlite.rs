//! SQLite-backed storage.
//!
//! A single on-disk database file holds one `records` table of opaque
//! ciphertext rows and one single-row `verifier` table. Nothing in the file
//! is plaintext note data, so the database itself needs no further
//! protection beyond filesystem permissions.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::traits::{RecordStore, VerifierStore};
use super::types::{EncryptedRecord, VaultVerifier};
use crate::error::{Result, VaultError};

/// SQLite store for encrypted records and the vault verifier.
pub struct SqliteStore {
    #[allow(dead_code)]
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at `path`, creating the file and schema on first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                nonce BLOB NOT NULL,
                ciphertext BLOB NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS verifier (
                id INTEGER PRIMARY KEY CHECK (id = 0),
                key_salt BLOB NOT NULL,
                verifier TEXT NOT NULL
            );
            "#,
        )?;

        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is
    /// poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Storage("SQLite connection poisoned".to_string()))
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| VaultError::Storage(format!("Invalid timestamp: {}", e)))
}

impl RecordStore for SqliteStore {
    fn get_all(&self) -> Result<Vec<EncryptedRecord>> {
        let conn = self.lock_conn()?;

        let mut stmt =
            conn.prepare("SELECT id, nonce, ciphertext, updated_at FROM records")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, Vec<u8>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id_str, nonce, ciphertext, updated_at_str) = row?;
            let id = Uuid::parse_str(&id_str)
                .map_err(|e| VaultError::Storage(format!("Invalid record UUID: {}", e)))?;
            records.push(EncryptedRecord {
                id,
                nonce,
                ciphertext,
                updated_at: parse_timestamp(&updated_at_str)?,
            });
        }

        Ok(records)
    }

    fn put(&self, record: &EncryptedRecord) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            INSERT INTO records (id, nonce, ciphertext, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                nonce = excluded.nonce,
                ciphertext = excluded.ciphertext,
                updated_at = excluded.updated_at
            "#,
            (
                record.id.to_string(),
                &record.nonce,
                &record.ciphertext,
                record.updated_at.to_rfc3339(),
            ),
        )?;

        Ok(())
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM records WHERE id = ?", [id.to_string()])?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM records", [])?;
        Ok(())
    }
}

impl VerifierStore for SqliteStore {
    fn load_verifier(&self) -> Result<Option<VaultVerifier>> {
        let conn = self.lock_conn()?;

        let result = conn
            .query_row(
                "SELECT key_salt, verifier FROM verifier WHERE id = 0",
                [],
                |row| {
                    Ok(VaultVerifier {
                        key_salt: row.get::<_, Vec<u8>>(0)?,
                        verifier: row.get::<_, String>(1)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    fn save_verifier(&self, verifier: &VaultVerifier) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            INSERT INTO verifier (id, key_salt, verifier)
            VALUES (0, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                key_salt = excluded.key_salt,
                verifier = excluded.verifier
            "#,
            (&verifier.key_salt, &verifier.verifier),
        )?;

        Ok(())
    }

    fn delete_verifier(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM verifier", [])?;
        Ok(())
    }
}
