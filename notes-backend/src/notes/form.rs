//! Note form input and field-level validation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::slug::{SLUG_MAX_LENGTH, is_valid_slug};
use super::store::{NoteChanges, NoteError};
use crate::models::Note;

pub const TITLE_MAX_LENGTH: usize = 100;

const REQUIRED: &str = "This field is required.";
const INVALID_SLUG: &str =
    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.";

fn too_long(max: usize, actual: usize) -> String {
    format!(
        "Ensure this value has at most {} characters (it has {}).",
        max, actual
    )
}

/// Raw create/edit form payload. Missing fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

/// Field name -> messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Store failures the user can correct, attached to the `slug` field
    pub fn from_store_error(err: &NoteError) -> Option<Self> {
        match err {
            NoteError::DuplicateSlug { .. } | NoteError::SlugUnderivable => {
                let mut errors = Self::default();
                errors.add("slug", err.to_string());
                Some(errors)
            }
            _ => None,
        }
    }
}

/// What a page renders for a form: current values plus errors
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub fields: NoteForm,
    pub errors: FormErrors,
}

impl NoteForm {
    /// Form pre-populated from an existing note
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }

    pub fn clean(&self) -> Result<NoteChanges, FormErrors> {
        let mut errors = FormErrors::default();
        let title = self.title.trim();
        let text = self.text.trim();
        let slug = self.slug.trim();

        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > TITLE_MAX_LENGTH {
            errors.add("title", too_long(TITLE_MAX_LENGTH, title.chars().count()));
        }

        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        if !slug.is_empty() {
            let len = slug.chars().count();
            if len > SLUG_MAX_LENGTH {
                errors.add("slug", too_long(SLUG_MAX_LENGTH, len));
            }
            if !is_valid_slug(slug) {
                errors.add("slug", INVALID_SLUG);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NoteChanges {
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.to_string(),
        })
    }

    pub fn render(&self, errors: FormErrors) -> FormView {
        FormView {
            fields: self.clone(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::store::SLUG_TAKEN_WARNING;

    fn form(title: &str, text: &str, slug: &str) -> NoteForm {
        NoteForm {
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_clean_valid_form() {
        let changes = form(" Новый заголовок ", "Новый текст", "new-slug")
            .clean()
            .expect("form should be valid");
        assert_eq!(changes.title, "Новый заголовок");
        assert_eq!(changes.text, "Новый текст");
        assert_eq!(changes.slug, "new-slug");
    }

    #[test]
    fn test_clean_allows_empty_slug() {
        let changes = form("Заголовок", "Текст", "").clean().unwrap();
        assert!(changes.slug.is_empty());
    }

    #[test]
    fn test_clean_required_fields() {
        let errors = form("", "  ", "").clean().unwrap_err();
        assert_eq!(errors.field("title"), [REQUIRED.to_string()]);
        assert_eq!(errors.field("text"), [REQUIRED.to_string()]);
        assert!(errors.field("slug").is_empty());
    }

    #[test]
    fn test_clean_rejects_bad_slug() {
        let errors = form("Заголовок", "Текст", "заметка 1").clean().unwrap_err();
        assert_eq!(errors.field("slug"), [INVALID_SLUG.to_string()]);
    }

    #[test]
    fn test_clean_length_limits() {
        let long_title = "т".repeat(TITLE_MAX_LENGTH + 1);
        let long_slug = "s".repeat(SLUG_MAX_LENGTH + 1);
        let errors = form(&long_title, "Текст", &long_slug).clean().unwrap_err();
        assert_eq!(errors.field("title").len(), 1);
        assert!(errors.field("title")[0].contains("at most 100"));
        assert_eq!(errors.field("slug").len(), 1);
    }

    #[test]
    fn test_store_errors_attach_to_slug() {
        let err = NoteError::DuplicateSlug {
            slug: "note_slug".to_string(),
        };
        let errors = FormErrors::from_store_error(&err).expect("user-correctable");
        assert_eq!(
            errors.field("slug"),
            [format!("note_slug{}", SLUG_TAKEN_WARNING)]
        );

        assert!(FormErrors::from_store_error(&NoteError::SlugUnderivable).is_some());
        assert!(FormErrors::from_store_error(&NoteError::NotFound).is_none());
    }

    #[test]
    fn test_from_note_prepopulates() {
        let note = Note {
            id: 1,
            title: "Заголовок".to_string(),
            text: "Текст".to_string(),
            slug: "note_slug".to_string(),
            author_id: 7,
        };
        assert_eq!(NoteForm::from_note(&note), form("Заголовок", "Текст", "note_slug"));
    }
}
