//! The note entity.

use serde::{Deserialize, Serialize};

use super::escape::html_escape;

/// A persisted note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-generated, always positive
    pub id: i64,
    pub title: String,
    pub body: String,
    /// Insertion timestamp as rendered by the store
    pub created_at: String,
}

impl Note {
    /// Copy with `title` and `body` HTML-escaped for a browser client
    pub fn html_escaped(&self) -> Self {
        Self {
            id: self.id,
            title: html_escape(&self.title),
            body: html_escape(&self.body),
            created_at: self.created_at.clone(),
        }
    }
}
