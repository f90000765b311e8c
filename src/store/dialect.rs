//! # SQL Dialects
//!
//! Every dialect-specific SQL fragment lives here. Call sites never branch on
//! the driver name; they ask the [`Dialect`] for a statement or use the
//! prebuilt [`Statements`] set.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::strategy::{InsertStrategy, LastInsertId, ReturningClause};

/// Supported relational store dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// PostgreSQL (`$n` placeholders, `RETURNING`, `ILIKE`)
    #[serde(rename = "pgsql")]
    Postgres,
    /// MySQL / MariaDB (`?` placeholders, no `RETURNING`)
    #[serde(rename = "mysql")]
    MySql,
    /// SQLite (`?` placeholders, `RETURNING` since 3.35)
    #[serde(rename = "sqlite")]
    Sqlite,
}

impl Dialect {
    /// Driver name as accepted by `DB_DRIVER`
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "pgsql",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// URL scheme understood by the sqlx `Any` driver
    pub fn url_scheme(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Port used when `DB_PORT` is not set
    pub fn default_port(&self) -> u16 {
        match self {
            Dialect::Postgres => 5432,
            Dialect::MySql => 3306,
            Dialect::Sqlite => 0,
        }
    }

    /// Bind placeholder for the `n`th parameter (1-based)
    pub fn placeholder(&self, n: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", n),
            Dialect::MySql | Dialect::Sqlite => "?".to_string(),
        }
    }

    /// Select list for a note row.
    ///
    /// `id` comes back as a 64-bit integer and `created_at` as text on every
    /// dialect so that rows decode identically through the `Any` driver.
    pub fn note_columns(&self) -> &'static str {
        match self {
            Dialect::Postgres => {
                "CAST(id AS BIGINT) AS id, title, body, CAST(created_at AS TEXT) AS created_at"
            }
            Dialect::MySql => {
                "CAST(id AS SIGNED) AS id, CAST(title AS CHAR) AS title, \
                 CAST(body AS CHAR) AS body, CAST(created_at AS CHAR) AS created_at"
            }
            Dialect::Sqlite => "id, title, body, created_at",
        }
    }

    /// Case-insensitive substring predicate against `column`.
    ///
    /// The bound pattern escapes `%`, `_` and `\` with a backslash (see
    /// [`like_pattern`]).
    pub fn contains_predicate(&self, column: &str, param: usize) -> String {
        let placeholder = self.placeholder(param);
        match self {
            Dialect::Postgres => format!("{} ILIKE {} ESCAPE '\\'", column, placeholder),
            // backslash is already MySQL's LIKE escape character
            Dialect::MySql => format!("{} LIKE {}", column, placeholder),
            // case folding covers ASCII letters only
            Dialect::Sqlite => format!("{} LIKE {} ESCAPE '\\'", column, placeholder),
        }
    }

    /// DDL for the notes table
    pub fn create_table_sql(&self) -> &'static str {
        match self {
            Dialect::Postgres => {
                "CREATE TABLE IF NOT EXISTS notes (\
                 id BIGSERIAL PRIMARY KEY, \
                 title VARCHAR(200) NOT NULL, \
                 body TEXT NOT NULL DEFAULT '', \
                 created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP)"
            }
            Dialect::MySql => {
                "CREATE TABLE IF NOT EXISTS notes (\
                 id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
                 title VARCHAR(200) NOT NULL, \
                 body TEXT NOT NULL, \
                 created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\
                 ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci"
            }
            Dialect::Sqlite => {
                "CREATE TABLE IF NOT EXISTS notes (\
                 id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 title TEXT NOT NULL, \
                 body TEXT NOT NULL DEFAULT '', \
                 created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP)"
            }
        }
    }

    /// Query for the id generated by the last insert on the current
    /// connection, as a signed 64-bit `id` column
    pub fn last_insert_id_sql(&self) -> &'static str {
        match self {
            Dialect::Postgres => "SELECT CAST(lastval() AS BIGINT) AS id",
            Dialect::MySql => "SELECT CAST(LAST_INSERT_ID() AS SIGNED) AS id",
            Dialect::Sqlite => "SELECT last_insert_rowid() AS id",
        }
    }

    /// Whether `INSERT ... RETURNING` is available
    pub fn supports_returning(&self) -> bool {
        match self {
            Dialect::Postgres | Dialect::Sqlite => true,
            Dialect::MySql => false,
        }
    }

    /// Insert strategy selected at startup for this dialect
    pub fn default_insert_strategy(&self) -> Arc<dyn InsertStrategy> {
        if self.supports_returning() {
            Arc::new(ReturningClause)
        } else {
            Arc::new(LastInsertId)
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for an unrecognised driver name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown database driver '{0}' (expected pgsql, mysql or sqlite)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pgsql" | "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}

/// Build a LIKE pattern matching `term` anywhere in a column.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Prebuilt statement set for one dialect
#[derive(Debug, Clone)]
pub struct Statements {
    pub list_all: String,
    pub list_matching: String,
    pub select_by_id: String,
    pub insert: String,
    pub insert_returning: String,
    pub last_insert_id: String,
    pub update: String,
    pub delete: String,
}

impl Statements {
    pub fn for_dialect(dialect: Dialect) -> Self {
        let cols = dialect.note_columns();
        let p = |n| dialect.placeholder(n);

        let insert = format!("INSERT INTO notes (title, body) VALUES ({}, {})", p(1), p(2));

        Self {
            list_all: format!("SELECT {} FROM notes ORDER BY id DESC", cols),
            list_matching: format!(
                "SELECT {} FROM notes WHERE {} OR {} ORDER BY id DESC",
                cols,
                dialect.contains_predicate("title", 1),
                dialect.contains_predicate("body", 2),
            ),
            select_by_id: format!("SELECT {} FROM notes WHERE id = {}", cols, p(1)),
            insert_returning: format!("{} RETURNING {}", insert, cols),
            insert,
            last_insert_id: dialect.last_insert_id_sql().to_string(),
            update: format!(
                "UPDATE notes SET title = {}, body = {} WHERE id = {}",
                p(1),
                p(2),
                p(3)
            ),
            delete: format!("DELETE FROM notes WHERE id = {}", p(1)),
        }
    }
}
