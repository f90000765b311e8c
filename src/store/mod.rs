//! # Note Store
//!
//! Persistence adapter for the notes table over PostgreSQL, MySQL or SQLite.
//!
//! Dialect differences are confined to [`Dialect`] (SQL text) and
//! [`InsertStrategy`] (how an inserted row is read back). Everything above
//! this module sees a single [`NoteStore`].

pub mod adapter;
pub mod config;
pub mod dialect;
pub mod errors;
pub mod row;
pub mod strategy;

pub use adapter::{ExecOutcome, NoteStore, SqlParam, StoreConnection};
pub use config::DatabaseConfig;
pub use dialect::{like_pattern, Dialect, Statements, UnknownDialect};
pub use errors::{StoreError, StoreResult};
pub use row::{Row, SqlValue};
pub use strategy::{InsertStrategy, LastInsertId, ReturningClause};
