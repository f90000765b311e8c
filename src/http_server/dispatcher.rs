//! # Notes Dispatcher
//!
//! Single endpoint selecting an operation by the `action` query parameter:
//!
//! - `list` (default) - all notes, newest first, optional `search`
//! - `create` - `{title, body}`
//! - `update` - `{id, title, body}`
//! - `delete` - `{id}`
//!
//! Any HTTP method is accepted. The JSON body is only read for write
//! actions; a missing or malformed body is treated as `{}`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use serde_json::{Map, Value};

use crate::notes::{sanitize_search, validate_id, Note, NoteInput};
use crate::store::NoteStore;

use super::envelope::Envelope;
use super::errors::{DispatchError, DispatchResult};

/// Operation selected by the `action` query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    Update,
    Delete,
    Unknown(String),
}

impl Action {
    /// A missing parameter means `list`; an empty one is unknown
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("list") => Action::List,
            Some("create") => Action::Create,
            Some("update") => Action::Update,
            Some("delete") => Action::Delete,
            Some(other) => Action::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Unknown(other) => other,
        }
    }
}

/// Successful action outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Notes(Vec<Note>),
    Note(Note),
    Empty,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Notes(notes) => Envelope::data(notes).into_response(),
            Reply::Note(note) => Envelope::data(note).into_response(),
            Reply::Empty => Envelope::ok().into_response(),
        }
    }
}

/// Validates requests and runs them against the store
pub struct NoteDispatcher {
    store: Arc<NoteStore>,
    escape_html: bool,
}

impl NoteDispatcher {
    pub fn new(store: Arc<NoteStore>, escape_html: bool) -> Self {
        Self { store, escape_html }
    }

    /// Run one action.
    ///
    /// `body` is the raw request body; it is parsed only for write actions.
    pub async fn dispatch(
        &self,
        action: &Action,
        search: Option<&str>,
        body: &[u8],
    ) -> DispatchResult<Reply> {
        tracing::debug!(action = action.as_str(), "dispatch");

        match action {
            Action::List => {
                let term = sanitize_search(search);
                let notes = self.store.list_notes(term.as_deref()).await?;
                Ok(Reply::Notes(notes.iter().map(|n| self.render(n)).collect()))
            }
            Action::Create => {
                let fields = parse_body(body);
                let input = NoteInput::from_fields(&fields)?;
                let note = self.store.create_note(&input.title, &input.body).await?;
                tracing::debug!(id = note.id, "note created");
                Ok(Reply::Note(self.render(&note)))
            }
            Action::Update => {
                let fields = parse_body(body);
                let id = validate_id(fields.get("id"))?;
                let input = NoteInput::from_fields(&fields)?;
                match self.store.update_note(id, &input.title, &input.body).await? {
                    Some(note) => Ok(Reply::Note(self.render(&note))),
                    None => Ok(Reply::Empty),
                }
            }
            Action::Delete => {
                let fields = parse_body(body);
                let id = validate_id(fields.get("id"))?;
                let removed = self.store.delete_note(id).await?;
                tracing::debug!(id, removed, "note deleted");
                Ok(Reply::Empty)
            }
            Action::Unknown(other) => Err(DispatchError::UnknownAction(other.clone())),
        }
    }

    fn render(&self, note: &Note) -> Note {
        if self.escape_html {
            note.html_escaped()
        } else {
            note.clone()
        }
    }
}

/// Parse a request body as a JSON object, falling back to an empty one
pub fn parse_body(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

/// Notes routes. `/api.php` is kept for existing clients.
pub fn notes_routes(dispatcher: Arc<NoteDispatcher>) -> Router {
    Router::new()
        .route("/", any(dispatch_handler))
        .route("/api.php", any(dispatch_handler))
        .with_state(dispatcher)
}

async fn dispatch_handler(
    State(dispatcher): State<Arc<NoteDispatcher>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Reply, DispatchError> {
    let Query(query) = query.map_err(|e| DispatchError::rejected(e.status(), e.body_text()))?;
    let body = body.map_err(|e| DispatchError::rejected(e.status(), e.body_text()))?;

    let action = Action::from_param(query.get("action").map(String::as_str));
    let search = query.get("search").map(String::as_str);
    dispatcher.dispatch(&action, search, &body).await
}
