//! # Note Store
//!
//! The persistence adapter. Owns a bounded connection pool for one dialect
//! and runs parameterized statements against the `notes` table.
//!
//! Construction connects eagerly; a store that cannot reach the database is
//! never handed to the HTTP layer. There is no reconnection logic beyond what
//! the pool does for individual connections.

use std::sync::Arc;
use std::time::Duration;

use sqlx::any::{AnyArguments, AnyPoolOptions, AnyQueryResult};
use sqlx::pool::PoolConnection;
use sqlx::query::Query;
use sqlx::{Any, AnyPool};

use crate::notes::Note;

use super::config::DatabaseConfig;
use super::dialect::{like_pattern, Dialect, Statements};
use super::errors::{StoreError, StoreResult};
use super::row::Row;
use super::strategy::InsertStrategy;

/// Bind parameter for [`NoteStore::query`] and [`NoteStore::execute`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SqlParam<'a> {
    Int(i64),
    Text(&'a str),
}

/// Metadata returned by a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    /// Generated id, when the driver reports one in the statement result.
    /// Only MySQL does; elsewhere ask the connection with
    /// [`Dialect::last_insert_id_sql`].
    pub last_insert_id: Option<i64>,
}

impl ExecOutcome {
    fn from_result(result: &AnyQueryResult) -> Self {
        Self {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        }
    }
}

/// A single pooled connection, returned to the pool on drop.
///
/// Statements run through one handle see the same session state, such as
/// the last generated id.
pub struct StoreConnection {
    conn: PoolConnection<Any>,
}

impl StoreConnection {
    pub async fn query(&mut self, sql: &str, params: &[SqlParam<'_>]) -> StoreResult<Vec<Row>> {
        tracing::trace!(sql, params = params.len(), "query on held connection");
        let rows = NoteStore::bind(sql, params).fetch_all(&mut *self.conn).await?;
        rows.iter().map(Row::from_any).collect()
    }

    pub async fn execute(&mut self, sql: &str, params: &[SqlParam<'_>]) -> StoreResult<ExecOutcome> {
        tracing::trace!(sql, params = params.len(), "execute on held connection");
        let result = NoteStore::bind(sql, params).execute(&mut *self.conn).await?;
        Ok(ExecOutcome::from_result(&result))
    }
}

/// Persistence adapter for notes
pub struct NoteStore {
    pool: AnyPool,
    dialect: Dialect,
    statements: Statements,
    inserter: Arc<dyn InsertStrategy>,
}

impl NoteStore {
    /// Connect using the dialect's default insert strategy
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        Self::connect_with_strategy(config, config.dialect.default_insert_strategy()).await
    }

    /// Connect with an explicit insert strategy
    pub async fn connect_with_strategy(
        config: &DatabaseConfig,
        inserter: Arc<dyn InsertStrategy>,
    ) -> StoreResult<Self> {
        sqlx::any::install_default_drivers();

        let mut options = AnyPoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

        if config.dialect == Dialect::Sqlite {
            // an in-memory database lives exactly as long as its connection
            options = options.min_connections(1).idle_timeout(None).max_lifetime(None);
        }

        let pool = options
            .connect(&config.url())
            .await
            .map_err(StoreError::Connect)?;

        tracing::info!(
            dialect = %config.dialect,
            host = %config.host,
            database = %config.name,
            insert_strategy = inserter.name(),
            "connected to note store"
        );

        Ok(Self {
            pool,
            dialect: config.dialect,
            statements: Statements::for_dialect(config.dialect),
            inserter,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn statements(&self) -> &Statements {
        &self.statements
    }

    pub fn insert_strategy(&self) -> &dyn InsertStrategy {
        self.inserter.as_ref()
    }

    fn bind<'q>(sql: &'q str, params: &[SqlParam<'q>]) -> Query<'q, Any, AnyArguments<'q>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match *param {
                SqlParam::Int(i) => query.bind(i),
                SqlParam::Text(s) => query.bind(s),
            };
        }
        query
    }

    /// Run a parameterized read
    pub async fn query(&self, sql: &str, params: &[SqlParam<'_>]) -> StoreResult<Vec<Row>> {
        tracing::trace!(sql, params = params.len(), "query");
        let rows = Self::bind(sql, params).fetch_all(&self.pool).await?;
        rows.iter().map(Row::from_any).collect()
    }

    /// Run a parameterized write
    pub async fn execute(&self, sql: &str, params: &[SqlParam<'_>]) -> StoreResult<ExecOutcome> {
        tracing::trace!(sql, params = params.len(), "execute");
        let result = Self::bind(sql, params).execute(&self.pool).await?;
        Ok(ExecOutcome::from_result(&result))
    }

    /// Hold one connection for a sequence of statements
    pub async fn acquire(&self) -> StoreResult<StoreConnection> {
        let conn = self.pool.acquire().await?;
        Ok(StoreConnection { conn })
    }

    /// Create the notes table if it does not exist
    pub async fn migrate(&self) -> StoreResult<()> {
        self.execute(self.dialect.create_table_sql(), &[]).await?;
        tracing::info!(dialect = %self.dialect, "notes table ready");
        Ok(())
    }

    /// All notes, newest first, optionally restricted to a search term
    pub async fn list_notes(&self, search: Option<&str>) -> StoreResult<Vec<Note>> {
        let rows = match search {
            Some(term) => {
                let pattern = like_pattern(term);
                self.query(
                    &self.statements.list_matching,
                    &[SqlParam::Text(&pattern), SqlParam::Text(&pattern)],
                )
                .await?
            }
            None => self.query(&self.statements.list_all, &[]).await?,
        };
        rows.into_iter().map(Note::try_from).collect()
    }

    pub async fn find_note(&self, id: i64) -> StoreResult<Option<Note>> {
        let rows = self
            .query(&self.statements.select_by_id, &[SqlParam::Int(id)])
            .await?;
        rows.into_iter().next().map(Note::try_from).transpose()
    }

    /// Insert a note and return it as persisted
    pub async fn create_note(&self, title: &str, body: &str) -> StoreResult<Note> {
        let row = self.inserter.insert(self, title, body).await?;
        Note::try_from(row)
    }

    /// Update title and body in place, then read the row back.
    ///
    /// Returns `None` when no note has this id; that is not an error.
    pub async fn update_note(&self, id: i64, title: &str, body: &str) -> StoreResult<Option<Note>> {
        let outcome = self
            .execute(
                &self.statements.update,
                &[SqlParam::Text(title), SqlParam::Text(body), SqlParam::Int(id)],
            )
            .await?;
        if outcome.rows_affected == 0 {
            tracing::debug!(id, "update matched no rows");
        }
        self.find_note(id).await
    }

    /// Delete a note; returns the number of rows removed (0 or 1)
    pub async fn delete_note(&self, id: i64) -> StoreResult<u64> {
        let outcome = self
            .execute(&self.statements.delete, &[SqlParam::Int(id)])
            .await?;
        Ok(outcome.rows_affected)
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
