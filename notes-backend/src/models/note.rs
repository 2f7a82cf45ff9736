use serde::Serialize;

/// A stored note. `slug` is unique across all authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: i64,
}

impl Note {
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

/// JSON view of a note, with the links a page would render
#[derive(Debug, Clone, Serialize)]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: i64,
    pub detail_url: String,
    pub edit_url: String,
    pub delete_url: String,
}

impl From<&Note> for NoteResponse {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
            author_id: note.author_id,
            detail_url: crate::config::paths::note_detail(&note.slug),
            edit_url: crate::config::paths::note_edit(&note.slug),
            delete_url: crate::config::paths::note_delete(&note.slug),
        }
    }
}
