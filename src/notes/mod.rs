//! # Notes
//!
//! The note entity, input validation, and HTML output encoding.

pub mod escape;
pub mod note;
pub mod validation;

pub use escape::html_escape;
pub use note::Note;
pub use validation::{
    sanitize_search, sanitize_text, validate_id, NoteInput, ValidationError, BODY_MAX_CHARS,
    SEARCH_MAX_CHARS, TITLE_MAX_CHARS,
};
