use std::sync::Arc;

use notevault_core::note::{NoteDraft, NoteFilter};
use notevault_core::store::MemoryStore;
use notevault_core::{Vault, VaultError};

fn unlocked_vault() -> Vault {
    let mut vault = Vault::with_store(Arc::new(MemoryStore::new()));
    vault.bootstrap("correct-horse").unwrap();
    vault
}

#[test]
fn blank_rewrite_of_existing_note_is_rejected() {
    let mut vault = unlocked_vault();

    let note = vault.persist_note(NoteDraft::new("A", "b")).unwrap();
    let result = vault.persist_note(NoteDraft::new("", "").with_id(note.id));
    assert!(matches!(result, Err(VaultError::Validation(_))));

    let stored = vault.get(&note.id).unwrap().unwrap();
    assert_eq!(stored.title, "A");
    assert_eq!(stored.content, "b");
}

#[test]
fn pinned_older_note_hydrates_before_newer_unpinned() {
    let mut vault = unlocked_vault();

    let older = vault.persist_note(NoteDraft::new("older", "x")).unwrap();
    let newer = vault.persist_note(NoteDraft::new("newer", "x")).unwrap();
    vault.toggle_pin(&older.id).unwrap();

    // Make the unpinned note the most recently touched one.
    let newer = vault
        .persist_note(NoteDraft::new("newer", "edited").with_id(newer.id))
        .unwrap();

    vault.lock();
    vault.unlock("correct-horse").unwrap();

    let view = vault.notes().unwrap();
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].id, older.id);
    assert!(view[0].pinned);
    assert_eq!(view[1].id, newer.id);
    // The unpinned note is the most recently touched, yet still sorts second.
    assert!(view[1].updated_at > view[0].updated_at);
}

#[test]
fn filtered_view_separates_archive_and_matches_queries() {
    let mut vault = unlocked_vault();

    vault
        .persist_note(NoteDraft::new("Grocery list", "eggs and coffee"))
        .unwrap();
    let meeting = vault
        .persist_note(NoteDraft::new("Meeting notes", "quarterly review"))
        .unwrap();
    vault.toggle_archive(&meeting.id).unwrap();

    let active = vault.filtered(&NoteFilter::new()).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Grocery list");

    let archived = vault.filtered(&NoteFilter::new().archived(true)).unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].title, "Meeting notes");

    let hits = vault
        .filtered(&NoteFilter::new().query("COFFEE"))
        .unwrap();
    assert_eq!(hits.len(), 1);

    let misses = vault
        .filtered(&NoteFilter::new().query("quarterly"))
        .unwrap();
    assert!(misses.is_empty(), "archived notes stay out of the active view");
}

#[test]
fn deleting_twice_and_deleting_unknown_ids_is_silent() {
    let mut vault = unlocked_vault();

    let note = vault.persist_note(NoteDraft::new("A", "b")).unwrap();
    vault.delete_note(&note.id).unwrap();
    vault.delete_note(&note.id).unwrap();
    vault.delete_note(&uuid::Uuid::new_v4()).unwrap();

    assert!(vault.notes().unwrap().is_empty());
}

#[test]
fn lock_requires_reauthentication() {
    let mut vault = unlocked_vault();
    vault.persist_note(NoteDraft::new("A", "b")).unwrap();

    vault.lock();
    assert!(matches!(
        vault.persist_note(NoteDraft::new("B", "c")),
        Err(VaultError::Locked)
    ));

    let outcome = vault.unlock("correct-horse").unwrap();
    assert_eq!(outcome.loaded, 1);
}
