//! Note database operations
//!
//! Slug uniqueness is enforced by the `UNIQUE` constraint on `notes.slug`;
//! callers detect conflicts with `DbError::is_unique_violation`.

use rusqlite::{OptionalExtension, Row, params};

use crate::db::{Database, DbResult};
use crate::models::Note;

const NOTE_COLUMNS: &str = "id, title, text, slug, author_id";

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        slug: row.get(3)?,
        author_id: row.get(4)?,
    })
}

impl Database {
    pub fn insert_note(&self, author_id: i64, title: &str, text: &str, slug: &str) -> DbResult<Note> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO notes (title, text, slug, author_id) VALUES (?1, ?2, ?3, ?4)",
            params![title, text, slug, author_id],
        )?;

        Ok(Note {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.to_string(),
            author_id,
        })
    }

    /// Notes written by one author, oldest first
    pub fn list_notes_by_author(&self, author_id: i64) -> DbResult<Vec<Note>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes WHERE author_id = ?1 ORDER BY id",
            NOTE_COLUMNS
        ))?;
        let notes = stmt
            .query_map(params![author_id], note_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    pub fn get_note_by_slug(&self, slug: &str) -> DbResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!("SELECT {} FROM notes WHERE slug = ?1", NOTE_COLUMNS),
                params![slug],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    /// Slug lookup restricted to one author
    pub fn get_note_by_slug_for_author(&self, slug: &str, author_id: i64) -> DbResult<Option<Note>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!("SELECT {} FROM notes WHERE slug = ?1 AND author_id = ?2", NOTE_COLUMNS),
                params![slug, author_id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    /// Update title/text/slug of a note owned by `author_id`. Returns false if no row matched.
    pub fn update_note(
        &self,
        id: i64,
        author_id: i64,
        title: &str,
        text: &str,
        slug: &str,
    ) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE notes SET title = ?1, text = ?2, slug = ?3 WHERE id = ?4 AND author_id = ?5",
            params![title, text, slug, id, author_id],
        )?;
        Ok(rows > 0)
    }

    /// Delete a note owned by `author_id`. Returns false if no row matched.
    pub fn delete_note(&self, id: i64, author_id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND author_id = ?2",
            params![id, author_id],
        )?;
        Ok(rows > 0)
    }

    pub fn count_notes(&self) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use tempfile::tempdir;

    #[test]
    fn test_insert_and_scoped_lookup() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("notes.db").to_str().unwrap(), 1).unwrap();
        let author = db.create_user("author", "hash").unwrap();
        let reader = db.create_user("reader", "hash").unwrap();

        let note = db.insert_note(author.id, "Заголовок", "Текст", "note-slug").unwrap();

        assert_eq!(db.get_note_by_slug("note-slug").unwrap(), Some(note.clone()));
        assert_eq!(
            db.get_note_by_slug_for_author("note-slug", author.id).unwrap(),
            Some(note)
        );
        assert!(db.get_note_by_slug_for_author("note-slug", reader.id).unwrap().is_none());
    }

    #[test]
    fn test_slug_is_globally_unique() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("notes.db").to_str().unwrap(), 1).unwrap();
        let author = db.create_user("author", "hash").unwrap();
        let reader = db.create_user("reader", "hash").unwrap();

        db.insert_note(author.id, "A", "a", "shared").unwrap();
        let err = db.insert_note(reader.id, "B", "b", "shared").unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(db.count_notes().unwrap(), 1);
    }

    #[test]
    fn test_update_and_delete_require_author() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("notes.db").to_str().unwrap(), 1).unwrap();
        let author = db.create_user("author", "hash").unwrap();
        let reader = db.create_user("reader", "hash").unwrap();
        let note = db.insert_note(author.id, "A", "a", "a").unwrap();

        assert!(!db.update_note(note.id, reader.id, "X", "x", "x").unwrap());
        assert!(!db.delete_note(note.id, reader.id).unwrap());
        assert!(db.update_note(note.id, author.id, "B", "b", "b").unwrap());
        assert_eq!(db.get_note_by_slug("b").unwrap().unwrap().title, "B");
        assert!(db.delete_note(note.id, author.id).unwrap());
        assert_eq!(db.count_notes().unwrap(), 0);
    }

    #[test]
    fn test_list_is_scoped_and_ordered() {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("notes.db").to_str().unwrap(), 1).unwrap();
        let author = db.create_user("author", "hash").unwrap();
        let reader = db.create_user("reader", "hash").unwrap();

        db.insert_note(author.id, "First", "1", "first").unwrap();
        db.insert_note(reader.id, "Other", "o", "other").unwrap();
        db.insert_note(author.id, "Second", "2", "second").unwrap();

        let slugs: Vec<String> = db
            .list_notes_by_author(author.id)
            .unwrap()
            .into_iter()
            .map(|n| n.slug)
            .collect();
        assert_eq!(slugs, vec!["first", "second"]);
    }
}
