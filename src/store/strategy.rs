//! # Insert Strategies
//!
//! How a freshly inserted note is read back. Dialects with a returning
//! clause do it in one statement; the others insert, read the generated id
//! on the same connection, and select the row by that id.
//!
//! The two steps of [`LastInsertId`] are not wrapped in a transaction. If the
//! follow-up select fails the insert stays committed and the caller sees the
//! select's error.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use super::adapter::{NoteStore, SqlParam};
use super::errors::{StoreError, StoreResult};
use super::row::Row;

/// Boxed future returned by [`InsertStrategy::insert`]
pub type InsertFuture<'a> = Pin<Box<dyn Future<Output = StoreResult<Row>> + Send + 'a>>;

/// Insert a note and return the row exactly as the store persisted it
pub trait InsertStrategy: Send + Sync + fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn insert<'a>(&'a self, store: &'a NoteStore, title: &'a str, body: &'a str) -> InsertFuture<'a>;
}

/// Single `INSERT ... RETURNING` statement
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturningClause;

impl InsertStrategy for ReturningClause {
    fn name(&self) -> &'static str {
        "returning"
    }

    fn insert<'a>(&'a self, store: &'a NoteStore, title: &'a str, body: &'a str) -> InsertFuture<'a> {
        Box::pin(async move {
            let rows = store
                .query(
                    &store.statements().insert_returning,
                    &[SqlParam::Text(title), SqlParam::Text(body)],
                )
                .await?;
            rows.into_iter().next().ok_or(StoreError::MissingInsertId)
        })
    }
}

/// Plain insert, then the generated id, then a select by id.
///
/// All three statements run on one held connection: the id is taken from
/// the statement result when the driver reports it, and otherwise from the
/// connection's last-insert-id query.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastInsertId;

impl InsertStrategy for LastInsertId {
    fn name(&self) -> &'static str {
        "last_insert_id"
    }

    fn insert<'a>(&'a self, store: &'a NoteStore, title: &'a str, body: &'a str) -> InsertFuture<'a> {
        Box::pin(async move {
            let statements = store.statements();
            let mut conn = store.acquire().await?;

            let outcome = conn
                .execute(&statements.insert, &[SqlParam::Text(title), SqlParam::Text(body)])
                .await?;
            let id = match outcome.last_insert_id {
                Some(id) => id,
                None => conn
                    .query(&statements.last_insert_id, &[])
                    .await?
                    .into_iter()
                    .next()
                    .ok_or(StoreError::MissingInsertId)?
                    .int("id")?,
            };
            if id < 1 {
                return Err(StoreError::MissingInsertId);
            }

            let rows = conn
                .query(&statements.select_by_id, &[SqlParam::Int(id)])
                .await?;
            rows.into_iter().next().ok_or(StoreError::InsertNotFound(id))
        })
    }
}
