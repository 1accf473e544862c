//! Core data types for notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A decrypted note.
///
/// Only ever held in memory while the vault is unlocked; at rest it exists
/// solely as an [`EncryptedRecord`](crate::store::EncryptedRecord).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, immutable once assigned
    pub id: Uuid,

    /// Title text (may be empty if content is not)
    pub title: String,

    /// Body text
    pub content: String,

    /// Pinned notes sort before unpinned ones
    pub pinned: bool,

    /// Archived notes are hidden from the active view
    pub archived: bool,

    /// When this note was created
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp; never earlier than `created_at`
    pub updated_at: DateTime<Utc>,
}

/// Caller input for creating or updating a note.
///
/// An absent `id` creates a new note. Unset optional fields inherit from the
/// existing note on update, or default to `false` on create.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    /// Existing note to update, or `None` to create
    pub id: Option<Uuid>,

    /// New title (trimmed on persist)
    pub title: String,

    /// New body (trimmed on persist)
    pub content: String,

    /// Pin state override
    pub pinned: Option<bool>,

    /// Archive state override
    pub archived: Option<bool>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            pinned: None,
            archived: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }
}

/// View-side filter over already-decrypted notes.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Case-insensitive substring matched against title and content
    pub query: Option<String>,

    /// Whether the archive or the active set is shown
    pub archived: bool,
}

impl NoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    pub(crate) fn matches(&self, note: &Note) -> bool {
        if note.archived != self.archived {
            return false;
        }
        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Sort notes for the repository view: pinned before unpinned, most recently
/// touched first within each group.
pub(crate) fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}
