//! Note access policy
//!
//! Every note-scoped request resolves its note through the author-scoped
//! lookup, so a note owned by someone else is indistinguishable from a
//! missing one.

use super::store::{NoteError, NoteStore};
use crate::models::{Note, User};

/// Who is making the request
#[derive(Debug, Clone)]
pub enum Actor {
    Anonymous,
    User(User),
}

impl Actor {
    pub fn user(&self) -> Option<&User> {
        match self {
            Actor::Anonymous => None,
            Actor::User(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User(_))
    }
}

/// Outcome of an authorization check
#[derive(Debug, PartialEq, Eq)]
pub enum Access<T> {
    /// Anonymous actor; send them to the login page
    LoginRequired,
    /// Missing, or owned by another user
    NotFound,
    Allowed(T),
}

pub struct NoteAccessPolicy<'a> {
    store: &'a NoteStore,
}

impl<'a> NoteAccessPolicy<'a> {
    pub fn new(store: &'a NoteStore) -> Self {
        Self { store }
    }

    /// Gate for list/add/success: any authenticated user
    pub fn require_user(actor: &Actor) -> Access<&User> {
        match actor.user() {
            Some(user) => Access::Allowed(user),
            None => Access::LoginRequired,
        }
    }

    /// Gate for detail/edit/delete: only the note's author
    pub fn authorize_note<'b>(
        &self,
        actor: &'b Actor,
        slug: &str,
    ) -> Result<Access<(&'b User, Note)>, NoteError> {
        let user = match actor.user() {
            Some(user) => user,
            None => return Ok(Access::LoginRequired),
        };

        match self.store.get_for_author(slug, user) {
            Ok(note) => Ok(Access::Allowed((user, note))),
            Err(NoteError::NotFound) => {
                log::debug!("[NOTES] '{}' not visible to {}", slug, user.username);
                Ok(Access::NotFound)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_require_user() {
        assert_eq!(
            NoteAccessPolicy::require_user(&Actor::Anonymous),
            Access::LoginRequired
        );

        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("notes.db").to_str().unwrap(), 1).unwrap();
        let user = db.create_user("author", "hash").unwrap();
        let actor = Actor::User(user.clone());
        assert_eq!(NoteAccessPolicy::require_user(&actor), Access::Allowed(&user));
    }

    #[test]
    fn test_note_access_states() {
        let dir = tempdir().unwrap();
        let db = Arc::new(Database::new(dir.path().join("notes.db").to_str().unwrap(), 2).unwrap());
        let author = db.create_user("Автор", "hash").unwrap();
        let reader = db.create_user("Читатель", "hash").unwrap();
        let store = NoteStore::new(db);
        let note = store.create(&author, "Заголовок", "Текст", "note_slug").unwrap();
        let policy = NoteAccessPolicy::new(&store);

        assert_eq!(
            policy.authorize_note(&Actor::Anonymous, "note_slug").unwrap(),
            Access::LoginRequired
        );

        let reader_actor = Actor::User(reader);
        assert_eq!(
            policy.authorize_note(&reader_actor, "note_slug").unwrap(),
            Access::NotFound
        );

        let author_actor = Actor::User(author.clone());
        assert_eq!(
            policy.authorize_note(&author_actor, "note_slug").unwrap(),
            Access::Allowed((&author, note))
        );
        assert_eq!(
            policy.authorize_note(&author_actor, "missing").unwrap(),
            Access::NotFound
        );
    }

    #[test]
    fn test_anonymous_is_not_authenticated() {
        assert!(!Actor::Anonymous.is_authenticated());
        assert!(Actor::Anonymous.user().is_none());
    }
}
