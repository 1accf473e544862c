//! Session-scoped note repository.
//!
//! Orchestrates unlock-time hydration and runtime mutation, keeping the
//! in-memory decrypted view consistent with the persisted encrypted records.
//! Two states: `Locked` (no key, empty view) and `Unlocked` (key held,
//! sorted view populated). Locking drops the only copy of the key, which is
//! zeroized on drop.
//!
//! Every mutation writes through to the store before the view updates, so a
//! store failure never leaves the view ahead of durable state. Overlapping
//! callers serialize on `&mut self`; the last write-through to complete for
//! a given id determines that id's state.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::crypto::codec::{decrypt_record, encrypt_note};
use crate::crypto::key::DerivedKey;
use crate::error::{Result, VaultError};
use crate::note::{sort_notes, Note, NoteDraft, NoteFilter};
use crate::store::RecordStore;

/// Result of hydrating the vault: how many notes loaded, and which records
/// could not be read.
#[derive(Debug)]
pub struct HydrateOutcome {
    /// Number of notes decrypted into the view
    pub loaded: usize,

    /// Records skipped because they failed to decrypt or parse; the rest of
    /// the vault is still fully usable
    pub skipped: Vec<SkippedRecord>,
}

/// One record that could not be hydrated.
#[derive(Debug)]
pub struct SkippedRecord {
    pub id: Uuid,
    pub error: VaultError,
}

enum SessionState {
    Locked,
    Unlocked { key: DerivedKey, notes: Vec<Note> },
}

/// Orchestrates the in-memory decrypted view over a [`RecordStore`].
pub struct NoteRepository {
    records: Arc<dyn RecordStore>,
    state: SessionState,
}

impl NoteRepository {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self {
            records,
            state: SessionState::Locked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, SessionState::Unlocked { .. })
    }

    /// Hydrate the view with the session key: retrieve all records and
    /// decrypt each.
    ///
    /// A single unreadable record never aborts the whole hydration: it is
    /// skipped and reported in the outcome while every remaining note is
    /// surfaced.
    pub fn unlock(&mut self, key: DerivedKey) -> Result<HydrateOutcome> {
        let encrypted = self.records.get_all()?;

        let mut notes = Vec::with_capacity(encrypted.len());
        let mut skipped = Vec::new();
        for record in encrypted {
            match decrypt_record(&record, &key) {
                Ok(note) => notes.push(note),
                Err(error) => {
                    warn!(record_id = %record.id, %error, "skipping unreadable record during hydration");
                    skipped.push(SkippedRecord {
                        id: record.id,
                        error,
                    });
                }
            }
        }
        sort_notes(&mut notes);

        let loaded = notes.len();
        self.state = SessionState::Unlocked { key, notes };
        Ok(HydrateOutcome { loaded, skipped })
    }

    /// Discard the session key and the decrypted view. Returning to
    /// `Unlocked` requires re-authentication.
    pub fn lock(&mut self) {
        self.state = SessionState::Locked;
    }

    /// The sorted view: pinned notes first, most recently touched first
    /// within each group.
    pub fn notes(&self) -> Result<&[Note]> {
        match &self.state {
            SessionState::Unlocked { notes, .. } => Ok(notes),
            SessionState::Locked => Err(VaultError::Locked),
        }
    }

    /// Notes matching a view-side filter, in view order.
    pub fn filtered(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let notes = self.notes()?;
        Ok(notes.iter().filter(|n| filter.matches(n)).cloned().collect())
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<&Note>> {
        let notes = self.notes()?;
        Ok(notes.iter().find(|n| n.id == *id))
    }

    /// Create or update a note from a draft.
    ///
    /// An absent draft id creates a note with a fresh id and `created_at`;
    /// a present id preserves the existing note's `created_at` and any
    /// fields the draft leaves unset. `updated_at` always advances, never
    /// behind `created_at`. A draft whose title and content are both empty
    /// after trimming is rejected without touching anything.
    pub fn persist_note(&mut self, draft: NoteDraft) -> Result<Note> {
        let (key, notes) = match &mut self.state {
            SessionState::Unlocked { key, notes } => (&*key, notes),
            SessionState::Locked => return Err(VaultError::Locked),
        };

        let title = draft.title.trim().to_string();
        let content = draft.content.trim().to_string();
        if title.is_empty() && content.is_empty() {
            return Err(VaultError::Validation(
                "Note needs a title or content".to_string(),
            ));
        }

        let now = Utc::now();
        let existing = draft
            .id
            .and_then(|id| notes.iter().find(|n| n.id == id))
            .map(|n| (n.created_at, n.pinned, n.archived));
        let created_at = existing.map(|(created_at, _, _)| created_at).unwrap_or(now);

        let note = Note {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            title,
            content,
            pinned: draft
                .pinned
                .or(existing.map(|(_, pinned, _)| pinned))
                .unwrap_or(false),
            archived: draft
                .archived
                .or(existing.map(|(_, _, archived)| archived))
                .unwrap_or(false),
            created_at,
            updated_at: now.max(created_at),
        };

        let record = encrypt_note(&note, key)?;
        self.records.put(&record)?;

        notes.retain(|n| n.id != note.id);
        notes.push(note.clone());
        sort_notes(notes);

        Ok(note)
    }

    /// Delete a note from the store, then the view. Deleting an id that was
    /// never persisted is a no-op.
    pub fn delete_note(&mut self, id: &Uuid) -> Result<()> {
        if !self.is_unlocked() {
            return Err(VaultError::Locked);
        }

        self.records.delete(id)?;
        if let SessionState::Unlocked { notes, .. } = &mut self.state {
            notes.retain(|n| n.id != *id);
        }
        Ok(())
    }

    /// Flip a note's pin state through the regular write-through path.
    pub fn toggle_pin(&mut self, id: &Uuid) -> Result<Note> {
        let note = self.require(id)?;
        let draft = NoteDraft::new(note.title.clone(), note.content.clone())
            .with_id(note.id)
            .pinned(!note.pinned)
            .archived(note.archived);
        self.persist_note(draft)
    }

    /// Flip a note's archive state through the regular write-through path.
    pub fn toggle_archive(&mut self, id: &Uuid) -> Result<Note> {
        let note = self.require(id)?;
        let draft = NoteDraft::new(note.title.clone(), note.content.clone())
            .with_id(note.id)
            .pinned(note.pinned)
            .archived(!note.archived);
        self.persist_note(draft)
    }

    /// Remove every encrypted record and empty the view. Valid while locked;
    /// used by vault reset.
    pub fn purge(&mut self) -> Result<()> {
        self.records.clear()?;
        if let SessionState::Unlocked { notes, .. } = &mut self.state {
            notes.clear();
        }
        Ok(())
    }

    fn require(&self, id: &Uuid) -> Result<Note> {
        self.get(id)?
            .cloned()
            .ok_or(VaultError::NoteNotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EncryptedRecord, MemoryStore};
    use chrono::Duration;

    fn unlocked_repo() -> (NoteRepository, Arc<MemoryStore>, DerivedKey) {
        let store = Arc::new(MemoryStore::new());
        let key = DerivedKey::from_bytes([42; 32]);
        let mut repo = NoteRepository::new(store.clone());
        repo.unlock(key.clone()).unwrap();
        (repo, store, key)
    }

    #[test]
    fn operations_fail_while_locked() {
        let store = Arc::new(MemoryStore::new());
        let mut repo = NoteRepository::new(store);

        assert!(matches!(repo.notes(), Err(VaultError::Locked)));
        let result = repo.persist_note(NoteDraft::new("a", "b"));
        assert!(matches!(result, Err(VaultError::Locked)));
        let result = repo.delete_note(&Uuid::new_v4());
        assert!(matches!(result, Err(VaultError::Locked)));
    }

    #[test]
    fn persist_creates_and_updates() {
        let (mut repo, _, _) = unlocked_repo();

        let created = repo.persist_note(NoteDraft::new("Title", "Body")).unwrap();
        assert_eq!(created.title, "Title");
        assert!(!created.pinned);
        assert!(created.updated_at >= created.created_at);

        let updated = repo
            .persist_note(NoteDraft::new("Title 2", "Body").with_id(created.id))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "Title 2");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(repo.notes().unwrap().len(), 1);
    }

    #[test]
    fn persist_trims_and_rejects_blank_drafts() {
        let (mut repo, _, _) = unlocked_repo();

        let note = repo.persist_note(NoteDraft::new("  A  ", " b ")).unwrap();
        assert_eq!(note.title, "A");
        assert_eq!(note.content, "b");

        let result = repo.persist_note(NoteDraft::new("   ", "\t"));
        assert!(matches!(result, Err(VaultError::Validation(_))));
        assert_eq!(repo.notes().unwrap().len(), 1);
    }

    #[test]
    fn blank_update_leaves_stored_note_unchanged() {
        let (mut repo, store, key) = unlocked_repo();

        let note = repo.persist_note(NoteDraft::new("A", "b")).unwrap();
        let result = repo.persist_note(NoteDraft::new("", "").with_id(note.id));
        assert!(matches!(result, Err(VaultError::Validation(_))));

        // The view and the store still hold the first version.
        assert_eq!(repo.get(&note.id).unwrap().unwrap().title, "A");
        let records = store.get_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(decrypt_record(&records[0], &key).unwrap(), note);
    }

    #[test]
    fn update_preserves_unset_flags() {
        let (mut repo, _, _) = unlocked_repo();

        let note = repo.persist_note(NoteDraft::new("A", "b")).unwrap();
        repo.toggle_pin(&note.id).unwrap();

        // A plain content edit must not unpin.
        let updated = repo
            .persist_note(NoteDraft::new("A", "new body").with_id(note.id))
            .unwrap();
        assert!(updated.pinned);
    }

    #[test]
    fn delete_is_idempotent_and_unknown_id_is_noop() {
        let (mut repo, _, _) = unlocked_repo();

        let note = repo.persist_note(NoteDraft::new("A", "b")).unwrap();
        repo.delete_note(&note.id).unwrap();
        assert!(repo.notes().unwrap().is_empty());

        repo.delete_note(&note.id).unwrap();
        repo.delete_note(&Uuid::new_v4()).unwrap();
        assert!(repo.notes().unwrap().is_empty());
    }

    #[test]
    fn view_is_sorted_after_every_mutation() {
        let (mut repo, _, _) = unlocked_repo();

        let older = repo.persist_note(NoteDraft::new("older", "x")).unwrap();
        let _newer = repo.persist_note(NoteDraft::new("newer", "x")).unwrap();

        // Newer first while nothing is pinned.
        assert_eq!(repo.notes().unwrap()[0].title, "newer");

        // Pinning the older note moves it to the front even though the
        // newer note has a later updated_at... until the pin itself touches
        // updated_at; the pinned group always leads regardless.
        repo.toggle_pin(&older.id).unwrap();
        let view = repo.notes().unwrap();
        assert_eq!(view[0].title, "older");
        assert!(view[0].pinned);
        assert!(!view[1].pinned);
    }

    #[test]
    fn toggle_archive_round_trips() {
        let (mut repo, _, _) = unlocked_repo();

        let note = repo.persist_note(NoteDraft::new("A", "b")).unwrap();
        let archived = repo.toggle_archive(&note.id).unwrap();
        assert!(archived.archived);

        let unarchived = repo.toggle_archive(&note.id).unwrap();
        assert!(!unarchived.archived);
    }

    #[test]
    fn toggle_on_unknown_id_reports_not_found() {
        let (mut repo, _, _) = unlocked_repo();
        let id = Uuid::new_v4();
        assert!(matches!(
            repo.toggle_pin(&id),
            Err(VaultError::NoteNotFound(got)) if got == id
        ));
    }

    #[test]
    fn hydration_skips_corrupt_records_and_keeps_the_rest() {
        let (mut repo, store, key) = unlocked_repo();

        repo.persist_note(NoteDraft::new("healthy one", "x")).unwrap();
        repo.persist_note(NoteDraft::new("healthy two", "x")).unwrap();

        // Plant a record that fails tag verification.
        let bad_id = Uuid::new_v4();
        store
            .put(&EncryptedRecord {
                id: bad_id,
                nonce: vec![0; 24],
                ciphertext: vec![0xAA; 64],
                updated_at: Utc::now(),
            })
            .unwrap();

        repo.lock();
        let outcome = repo.unlock(key).unwrap();

        assert_eq!(outcome.loaded, 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].id, bad_id);
        assert!(matches!(
            outcome.skipped[0].error,
            VaultError::Authentication
        ));
        assert_eq!(repo.notes().unwrap().len(), 2);
    }

    #[test]
    fn lock_empties_the_view() {
        let (mut repo, _, key) = unlocked_repo();
        repo.persist_note(NoteDraft::new("A", "b")).unwrap();

        repo.lock();
        assert!(!repo.is_unlocked());
        assert!(matches!(repo.notes(), Err(VaultError::Locked)));

        // Re-unlock restores the persisted note.
        let outcome = repo.unlock(key).unwrap();
        assert_eq!(outcome.loaded, 1);
    }

    #[test]
    fn purge_clears_store_and_view() {
        let (mut repo, store, _) = unlocked_repo();
        repo.persist_note(NoteDraft::new("A", "b")).unwrap();

        repo.purge().unwrap();
        assert!(repo.notes().unwrap().is_empty());
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn updated_at_never_regresses_below_created_at() {
        let (mut repo, store, key) = unlocked_repo();

        // A note whose created_at sits in the future, as after a clock step.
        let future = Utc::now() + Duration::hours(1);
        let note = Note {
            id: Uuid::new_v4(),
            title: "A".to_string(),
            content: "b".to_string(),
            pinned: false,
            archived: false,
            created_at: future,
            updated_at: future,
        };
        store.put(&encrypt_note(&note, &key).unwrap()).unwrap();

        repo.lock();
        repo.unlock(key).unwrap();

        let updated = repo
            .persist_note(NoteDraft::new("A", "b2").with_id(note.id))
            .unwrap();
        assert_eq!(updated.created_at, future);
        assert!(updated.updated_at >= updated.created_at);
    }
}
