//! Driver-independent result rows.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlx::any::AnyRow;
use sqlx::{Column, Row as _};

use crate::notes::Note;

use super::errors::{StoreError, StoreResult};

/// A single column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Null => serializer.serialize_none(),
            SqlValue::Int(i) => serializer.serialize_i64(*i),
            SqlValue::Float(f) => serializer.serialize_f64(*f),
            SqlValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Ordered field-name to value mapping, in select-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub(crate) fn int(&self, name: &str) -> StoreResult<i64> {
        match self.get(name) {
            Some(SqlValue::Int(i)) => Ok(*i),
            Some(SqlValue::Text(s)) => s
                .trim()
                .parse()
                .map_err(|_| StoreError::decode(name, format!("'{}' is not an integer", s))),
            Some(other) => Err(StoreError::decode(name, format!("expected integer, got {:?}", other))),
            None => Err(StoreError::decode(name, "column missing")),
        }
    }

    fn text(&self, name: &str) -> StoreResult<String> {
        match self.get(name) {
            Some(SqlValue::Text(s)) => Ok(s.clone()),
            Some(SqlValue::Int(i)) => Ok(i.to_string()),
            Some(other) => Err(StoreError::decode(name, format!("expected text, got {:?}", other))),
            None => Err(StoreError::decode(name, "column missing")),
        }
    }

    /// Decode a row from the `Any` driver.
    ///
    /// The `Any` driver only exposes a handful of value kinds, so each column
    /// is tried as integer, then float, then text.
    pub fn from_any(row: &AnyRow) -> StoreResult<Self> {
        let mut out = Row::new();
        for column in row.columns() {
            let idx = column.ordinal();
            let name = column.name();

            let value = if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
                v.map_or(SqlValue::Null, SqlValue::Int)
            } else if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
                v.map_or(SqlValue::Null, SqlValue::Float)
            } else if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
                v.map_or(SqlValue::Null, SqlValue::Text)
            } else if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
                v.map_or(SqlValue::Null, |bytes| {
                    SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())
                })
            } else {
                return Err(StoreError::decode(name, "unsupported column type"));
            };

            out.push(name, value);
        }
        Ok(out)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl TryFrom<Row> for Note {
    type Error = StoreError;

    fn try_from(row: Row) -> StoreResult<Self> {
        Ok(Note {
            id: row.int("id")?,
            title: row.text("title")?,
            body: row.text("body")?,
            created_at: row.text("created_at")?,
        })
    }
}
