mod note;
mod user;

pub use note::{Note, NoteResponse};
pub use user::{Session, User, UserResponse};
