//! Notes — personal text notes addressed by a globally unique slug
//!
//! `store` owns persistence and ownership checks, `policy` decides who may
//! see a note, `form` validates user input, and `slug` derives slugs from
//! titles.

pub mod form;
pub mod policy;
pub mod slug;
pub mod store;

pub use form::{FormErrors, NoteForm};
pub use policy::{Access, Actor, NoteAccessPolicy};
pub use store::{NoteError, NoteStore};
