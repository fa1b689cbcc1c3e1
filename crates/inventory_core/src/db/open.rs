//! Per-operation connection bootstrap.
//!
//! # Responsibility
//! - Open the configured SQLite file with the configured busy timeout.
//! - Register the case-folding SQL function used by item search.
//! - Create the `items` table before handing the connection out.

use super::{DbError, DbResult};
use crate::config::DatabaseConfig;
use log::{debug, error, info};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::time::Instant;

/// Schema version written to `PRAGMA user_version` once `items` exists.
pub const SCHEMA_VERSION: u32 = 1;

/// SQL name of the Unicode lowercase function available on every connection.
pub const CASEFOLD_FN: &str = "casefold";

const ITEMS_TABLE_SQL: &str = include_str!("items.sql");

/// Opens a connection to the configured database with schema applied.
///
/// # Side effects
/// - Creates the database file when missing.
/// - Emits `db_open` debug events; failures are logged at error level.
pub fn open_db(config: &DatabaseConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = connect(config);
    match &result {
        Ok(_) => debug!(
            "event=db_open module=db status=ok target={} duration_ms={}",
            config.target(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error target={} duration_ms={} error_code={} error={}",
            config.target(),
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

/// Creates the `items` table if it does not exist yet.
///
/// Safe to call on every startup. Failures are logged and returned.
pub fn ensure_schema(config: &DatabaseConfig) -> DbResult<()> {
    let started_at = Instant::now();
    info!(
        "event=ensure_schema module=db status=start target={}",
        config.target()
    );

    let conn = open_db(config)?;
    drop(conn);

    info!(
        "event=ensure_schema module=db status=ok target={} duration_ms={}",
        config.target(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}

fn connect(config: &DatabaseConfig) -> DbResult<Connection> {
    let open_failed = |source: rusqlite::Error| DbError::Open {
        target: config.target(),
        source,
    };

    let mut conn = Connection::open(&config.database).map_err(open_failed)?;
    conn.busy_timeout(config.connect_timeout)
        .map_err(open_failed)?;
    register_casefold(&conn).map_err(open_failed)?;
    create_items_table(&mut conn, config)?;
    Ok(conn)
}

/// `casefold(text)` lowercases with full Unicode rules; SQLite's own
/// `lower()` and `LIKE` only fold ASCII.
fn register_casefold(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: String = ctx.get(0)?;
            Ok(text.to_lowercase())
        },
    )
}

fn create_items_table(conn: &mut Connection, config: &DatabaseConfig) -> DbResult<()> {
    let schema_failed = |source: rusqlite::Error| DbError::Schema {
        target: config.target(),
        source,
    };

    let found: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(schema_failed)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            target: config.target(),
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction().map_err(schema_failed)?;
    tx.execute_batch(ITEMS_TABLE_SQL).map_err(schema_failed)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .map_err(schema_failed)?;
    tx.commit().map_err(schema_failed)
}
