//! Sled-backed persistence for users and notes.
//!
//! Three trees:
//! - `users`: user id → serialized [`User`]
//! - `users:email`: lower-cased email → user id
//! - `notes`: `owner_id \0 note_id` → serialized [`Note`]
//!
//! Every note operation is scoped by owner. A note that belongs to someone
//! else is indistinguishable from a missing one.

use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Note, NoteDraft, SearchMatch, SearchResult, TagCount, User};

const USERS_TREE: &str = "users";
const EMAIL_INDEX_TREE: &str = "users:email";
const NOTES_TREE: &str = "notes";

#[derive(Clone)]
pub struct Store {
    db: sled::Db,
    users: sled::Tree,
    emails: sled::Tree,
    notes: sled::Tree,
}

// ============================================================================
// Key Encoding
// ============================================================================

fn encode_note_key(owner_id: &str, note_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner_id.len() + note_id.len() + 1);
    key.extend_from_slice(owner_id.as_bytes());
    key.push(0);
    key.extend_from_slice(note_id.as_bytes());
    key
}

fn owner_prefix(owner_id: &str) -> Vec<u8> {
    let mut prefix = owner_id.as_bytes().to_vec();
    prefix.push(0);
    prefix
}

pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(16)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_db(sled::open(path)?)
    }

    /// In-memory store that is discarded on drop.
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        Ok(Self {
            users: db.open_tree(USERS_TREE)?,
            emails: db.open_tree(EMAIL_INDEX_TREE)?,
            notes: db.open_tree(NOTES_TREE)?,
            db,
        })
    }

    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await?;
        Ok(())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub fn create_user(&self, email: &str, name: Option<&str>, password_hash: &str) -> Result<User> {
        let email_key = normalize_email(email);
        let user = User {
            id: generate_id(),
            email: email.trim().to_string(),
            name: name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        // Claim the email first so two concurrent registrations cannot both win
        let claimed = self.emails.compare_and_swap(
            email_key.as_bytes(),
            None as Option<&[u8]>,
            Some(user.id.as_bytes()),
        )?;
        if claimed.is_err() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        self.users
            .insert(user.id.as_bytes(), serde_json::to_vec(&user)?)?;
        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        match self.users.get(id.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        match self.emails.get(normalize_email(email).as_bytes())? {
            Some(id) => self.get_user(&String::from_utf8_lossy(&id)),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Notes
    // ========================================================================

    pub fn create_note(&self, owner_id: &str, draft: NoteDraft) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: generate_id(),
            owner_id: owner_id.to_string(),
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            summary: None,
            created_at: now,
            updated_at: now,
        };
        self.put_note(&note)?;
        tracing::info!(note_id = %note.id, "created note");
        Ok(note)
    }

    pub fn get_note(&self, owner_id: &str, id: &str) -> Result<Note> {
        match self.notes.get(encode_note_key(owner_id, id))? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Err(AppError::NotFound("Note not found".to_string())),
        }
    }

    /// Replace title, content and tags. A stored summary is dropped when the
    /// content it was generated from changes.
    pub fn update_note(&self, owner_id: &str, id: &str, draft: NoteDraft) -> Result<Note> {
        let note = self.modify_note(owner_id, id, |note| {
            if note.content != draft.content {
                note.summary = None;
            }
            note.title = draft.title.clone();
            note.content = draft.content.clone();
            note.tags = draft.tags.clone();
            note.updated_at = Utc::now();
            Ok(())
        })?;
        tracing::info!(note_id = %note.id, "updated note");
        Ok(note)
    }

    pub fn delete_note(&self, owner_id: &str, id: &str) -> Result<()> {
        match self.notes.remove(encode_note_key(owner_id, id))? {
            Some(_) => {
                tracing::info!(note_id = %id, "deleted note");
                Ok(())
            }
            None => Err(AppError::NotFound("Note not found".to_string())),
        }
    }

    /// Store a summary generated from `source_content`, without touching
    /// `updated_at`. Fails with `Conflict` when the note's content is no
    /// longer `source_content`.
    pub fn set_summary(
        &self,
        owner_id: &str,
        id: &str,
        source_content: &str,
        summary: &str,
    ) -> Result<Note> {
        self.modify_note(owner_id, id, |note| {
            if note.content != source_content {
                tracing::warn!(note_id = %note.id, "discarding summary of outdated content");
                return Err(AppError::Conflict(
                    "The note changed while its summary was being generated. Please try again."
                        .to_string(),
                ));
            }
            note.summary = Some(summary.to_string());
            Ok(())
        })
    }

    /// Read-modify-write of one note. The write only lands if the record is
    /// unchanged since it was read; otherwise `apply` runs again on the
    /// fresh record.
    fn modify_note<F>(&self, owner_id: &str, id: &str, mut apply: F) -> Result<Note>
    where
        F: FnMut(&mut Note) -> Result<()>,
    {
        let key = encode_note_key(owner_id, id);
        loop {
            let Some(current) = self.notes.get(&key)? else {
                return Err(AppError::NotFound("Note not found".to_string()));
            };
            let mut note: Note = serde_json::from_slice(&current)?;
            apply(&mut note)?;
            let updated = serde_json::to_vec(&note)?;
            if self
                .notes
                .compare_and_swap(&key, Some(&current), Some(updated))?
                .is_ok()
            {
                return Ok(note);
            }
            tracing::debug!(note_id = %id, "concurrent note write, retrying");
        }
    }

    fn put_note(&self, note: &Note) -> Result<()> {
        self.notes.insert(
            encode_note_key(&note.owner_id, &note.id),
            serde_json::to_vec(note)?,
        )?;
        Ok(())
    }

    /// All notes of one owner, most recently updated first.
    pub fn list_notes(&self, owner_id: &str) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        for entry in self.notes.scan_prefix(owner_prefix(owner_id)) {
            let (_, data) = entry?;
            match serde_json::from_slice::<Note>(&data) {
                Ok(note) => notes.push(note),
                Err(e) => tracing::warn!("skipping unreadable note record: {}", e),
            }
        }
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    /// Case-insensitive substring search over title and content.
    pub fn search_notes(&self, owner_id: &str, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(search_in(&self.list_notes(owner_id)?, query))
    }

    /// Tag frequencies, most used first, ties broken alphabetically.
    pub fn tag_counts(&self, owner_id: &str) -> Result<Vec<TagCount>> {
        Ok(count_tags(&self.list_notes(owner_id)?))
    }

    pub fn notes_with_tag(&self, owner_id: &str, tag: &str) -> Result<Vec<Note>> {
        Ok(self
            .list_notes(owner_id)?
            .into_iter()
            .filter(|n| n.has_tag(tag))
            .collect())
    }
}

// ============================================================================
// Search and Tag Helpers
// ============================================================================

/// Keeps the input order, so results stay sorted by `updated_at`.
pub fn search_in(notes: &[Note], query: &str) -> Vec<SearchResult> {
    use rayon::prelude::*;

    let query_lower = query.to_lowercase();

    notes
        .par_iter()
        .filter_map(|note| {
            let mut matches = Vec::new();

            if note.title.to_lowercase().contains(&query_lower) {
                matches.push(SearchMatch {
                    line_number: 0,
                    line_content: format!("Title: {}", note.title),
                });
            }

            for (i, line) in note.content.lines().enumerate() {
                if line.to_lowercase().contains(&query_lower) {
                    matches.push(SearchMatch {
                        line_number: i + 1,
                        line_content: line.to_string(),
                    });
                }
            }

            if matches.is_empty() {
                None
            } else {
                Some(SearchResult {
                    note: note.clone(),
                    matches,
                })
            }
        })
        .collect()
}

pub fn count_tags(notes: &[Note]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for note in notes {
        for tag in note.tags.iter().filter(|t| !t.trim().is_empty()) {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut sorted: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    sorted
}
