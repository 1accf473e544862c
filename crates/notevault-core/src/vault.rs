//! Vault facade: authenticator and repository over one shared store.
//!
//! One owned object for the whole session flow: bootstrap or unlock at a
//! passphrase gate, mutate while unlocked, lock or reset.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::auth::PassphraseAuthenticator;
use crate::error::Result;
use crate::note::{Note, NoteDraft, NoteFilter};
use crate::repository::{HydrateOutcome, NoteRepository};
use crate::store::{RecordStore, SqliteStore, VerifierStore};

/// A single-user encrypted note vault.
pub struct Vault {
    auth: PassphraseAuthenticator,
    repo: NoteRepository,
}

impl Vault {
    /// Open a vault backed by a SQLite file, creating it on first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_store(Arc::new(SqliteStore::open(path)?)))
    }

    /// Open a vault over any store implementing both storage contracts.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: RecordStore + VerifierStore + 'static,
    {
        Self {
            auth: PassphraseAuthenticator::new(store.clone()),
            repo: NoteRepository::new(store),
        }
    }

    /// Whether the vault has been bootstrapped with a passphrase.
    pub fn is_initialized(&self) -> Result<bool> {
        self.auth.is_initialized()
    }

    pub fn is_unlocked(&self) -> bool {
        self.repo.is_unlocked()
    }

    /// First-use setup: establish the passphrase and unlock the (empty)
    /// vault.
    pub fn bootstrap(&mut self, passphrase: &str) -> Result<HydrateOutcome> {
        let key = self.auth.bootstrap(passphrase)?;
        self.repo.unlock(key)
    }

    /// Verify the passphrase and hydrate the decrypted view. On failure the
    /// vault stays locked and the view stays empty.
    pub fn unlock(&mut self, passphrase: &str) -> Result<HydrateOutcome> {
        let key = self.auth.verify(passphrase)?;
        self.repo.unlock(key)
    }

    /// Discard the session key and the decrypted view.
    pub fn lock(&mut self) {
        self.repo.lock();
    }

    /// Destroy the vault: delete the verifier and every encrypted record,
    /// then lock. Irreversible. This is the only remedy for a forgotten
    /// passphrase, so it deliberately does not require one.
    pub fn reset(&mut self) -> Result<()> {
        warn!("vault reset: destroying verifier and all encrypted records");
        self.auth.reset()?;
        self.repo.purge()?;
        self.repo.lock();
        Ok(())
    }

    pub fn notes(&self) -> Result<&[Note]> {
        self.repo.notes()
    }

    pub fn filtered(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        self.repo.filtered(filter)
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<&Note>> {
        self.repo.get(id)
    }

    pub fn persist_note(&mut self, draft: NoteDraft) -> Result<Note> {
        self.repo.persist_note(draft)
    }

    pub fn delete_note(&mut self, id: &Uuid) -> Result<()> {
        self.repo.delete_note(id)
    }

    pub fn toggle_pin(&mut self, id: &Uuid) -> Result<Note> {
        self.repo.toggle_pin(id)
    }

    pub fn toggle_archive(&mut self, id: &Uuid) -> Result<Note> {
        self.repo.toggle_archive(id)
    }
}
