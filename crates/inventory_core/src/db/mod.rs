//! SQLite connection bootstrap and schema creation.
//!
//! # Responsibility
//! - Open one configured SQLite connection per storage operation.
//! - Create the `items` table before any application read or write.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Connections are never shared or pooled; dropping one releases it.
//! - Error messages name the configured target, never the password.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{ensure_schema, open_db, CASEFOLD_FN, SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

/// Storage failure below the item store.
#[derive(Debug)]
pub enum DbError {
    /// The database file could not be opened or configured.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Creating the `items` table failed.
    Schema {
        target: String,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build.
    SchemaTooNew {
        target: String,
        found: u32,
        supported: u32,
    },
    /// A statement failed on an open connection.
    Query(rusqlite::Error),
}

impl DbError {
    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::Schema { .. } => "db_schema_failed",
            Self::SchemaTooNew { .. } => "db_schema_too_new",
            Self::Query(_) => "db_query_failed",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => write!(f, "cannot open {target}: {source}"),
            Self::Schema { target, source } => {
                write!(f, "cannot create items table in {target}: {source}")
            }
            Self::SchemaTooNew {
                target,
                found,
                supported,
            } => write!(
                f,
                "{target} has schema version {found}; this build supports up to {supported}"
            ),
            Self::Query(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Schema { source, .. } => Some(source),
            Self::Query(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}
