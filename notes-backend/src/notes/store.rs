//! NoteStore — ownership-scoped note storage
//!
//! Wraps the `notes` table. Slug uniqueness is global and enforced by the
//! database constraint, so two concurrent creates with the same slug cannot
//! both succeed; the loser surfaces as `NoteError::DuplicateSlug`.

use std::sync::Arc;
use thiserror::Error;

use super::slug;
use crate::db::{Database, DbError};
use crate::models::{Note, User};

/// Fixed suffix appended to a conflicting slug in the duplicate-slug message
pub const SLUG_TAKEN_WARNING: &str =
    " - such a slug already exists, please come up with a unique value!";

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("{slug}{warning}", warning = SLUG_TAKEN_WARNING)]
    DuplicateSlug { slug: String },
    #[error("Could not build a slug from the title, please enter one.")]
    SlugUnderivable,
    #[error("note not found")]
    NotFound,
    #[error("only the author may change this note")]
    Forbidden,
    #[error(transparent)]
    Database(#[from] DbError),
}

/// New field values for a note. An empty `slug` is derived from `title`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: String,
    pub text: String,
    pub slug: String,
}

/// Title-to-slug transform used when no slug is supplied
pub type Slugger = fn(&str) -> String;

#[derive(Clone)]
pub struct NoteStore {
    db: Arc<Database>,
    slugger: Slugger,
}

impl NoteStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            slugger: slug::slugify,
        }
    }

    /// Replace the slug derivation function
    pub fn with_slugger(mut self, slugger: Slugger) -> Self {
        self.slugger = slugger;
        self
    }

    fn resolve_slug(&self, title: &str, slug: &str) -> Result<String, NoteError> {
        let slug = slug.trim();
        if !slug.is_empty() {
            return Ok(slug.to_string());
        }
        let derived = (self.slugger)(title);
        if derived.is_empty() {
            return Err(NoteError::SlugUnderivable);
        }
        Ok(derived)
    }

    /// Create a note owned by `author`
    pub fn create(
        &self,
        author: &User,
        title: &str,
        text: &str,
        slug_or_empty: &str,
    ) -> Result<Note, NoteError> {
        let slug = self.resolve_slug(title, slug_or_empty)?;

        match self.db.insert_note(author.id, title, text, &slug) {
            Ok(note) => {
                log::info!("[NOTES] {} created note '{}'", author.username, note.slug);
                Ok(note)
            }
            Err(e) if e.is_unique_violation() => Err(NoteError::DuplicateSlug { slug }),
            Err(e) => Err(e.into()),
        }
    }

    /// All notes authored by `user`, oldest first
    pub fn list_for(&self, user: &User) -> Result<Vec<Note>, NoteError> {
        Ok(self.db.list_notes_by_author(user.id)?)
    }

    pub fn get_by_slug(&self, slug: &str) -> Result<Note, NoteError> {
        self.db.get_note_by_slug(slug)?.ok_or(NoteError::NotFound)
    }

    /// Slug lookup scoped to the author. Someone else's note reads as missing.
    pub fn get_for_author(&self, slug: &str, user: &User) -> Result<Note, NoteError> {
        self.db
            .get_note_by_slug_for_author(slug, user.id)?
            .ok_or(NoteError::NotFound)
    }

    pub fn update(
        &self,
        note: &Note,
        acting: &User,
        changes: &NoteChanges,
    ) -> Result<Note, NoteError> {
        if !note.is_authored_by(acting.id) {
            return Err(NoteError::Forbidden);
        }
        let slug = self.resolve_slug(&changes.title, &changes.slug)?;

        match self
            .db
            .update_note(note.id, acting.id, &changes.title, &changes.text, &slug)
        {
            Ok(true) => {
                log::info!("[NOTES] {} updated note '{}'", acting.username, slug);
                Ok(Note {
                    id: note.id,
                    title: changes.title.clone(),
                    text: changes.text.clone(),
                    slug,
                    author_id: note.author_id,
                })
            }
            Ok(false) => Err(NoteError::NotFound),
            Err(e) if e.is_unique_violation() => Err(NoteError::DuplicateSlug { slug }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, note: &Note, acting: &User) -> Result<(), NoteError> {
        if !note.is_authored_by(acting.id) {
            return Err(NoteError::Forbidden);
        }
        if self.db.delete_note(note.id, acting.id)? {
            log::info!("[NOTES] {} deleted note '{}'", acting.username, note.slug);
            Ok(())
        } else {
            Err(NoteError::NotFound)
        }
    }

    /// Total number of notes across all authors
    pub fn count(&self) -> Result<i64, NoteError> {
        Ok(self.db.count_notes()?)
    }
}
