//! Item store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/update/delete/search over the `items` table.
//! - Keep SQL and connection handling inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `validate()` before touching SQL.
//! - Read paths reject rows that violate the item invariant.
//! - Every operation opens its own connection and releases it on return.
//! - Statements are single and parameterized; nothing spans a transaction.

use crate::config::DatabaseConfig;
use crate::db::{ensure_schema, open_db, DbError, CASEFOLD_FN};
use crate::model::item::{Item, ItemId, ItemValidationError, NewItem};
use log::{debug, error, info};
use rusqlite::{params, Connection, Row, ToSql};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    name,
    category,
    quantity,
    price
FROM items";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of an item store operation.
#[derive(Debug)]
pub enum StoreError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
}

impl StoreError {
    /// Whether the failure means "nothing matched" rather than a broken store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}

/// Data-access contract for inventory items.
pub trait ItemStore {
    fn ensure_schema(&self) -> StoreResult<()>;
    fn insert(&self, item: &NewItem) -> StoreResult<ItemId>;
    fn get(&self, id: ItemId) -> StoreResult<Option<Item>>;
    fn list_all(&self) -> StoreResult<Vec<Item>>;
    fn update(&self, item: &Item) -> StoreResult<()>;
    fn delete(&self, id: ItemId) -> StoreResult<()>;
    /// Case-insensitive substring match on name or category.
    fn search(&self, term: &str) -> StoreResult<Vec<Item>>;
}

/// SQLite-backed item store opening one connection per call.
#[derive(Debug, Clone)]
pub struct SqliteItemStore {
    config: DatabaseConfig,
}

impl SqliteItemStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    fn connect(&self) -> StoreResult<Connection> {
        Ok(open_db(&self.config)?)
    }
}

impl ItemStore for SqliteItemStore {
    fn ensure_schema(&self) -> StoreResult<()> {
        Ok(ensure_schema(&self.config)?)
    }

    fn insert(&self, item: &NewItem) -> StoreResult<ItemId> {
        let started_at = Instant::now();
        let result = self.insert_row(item);
        match &result {
            Ok(id) => info!(
                "event=item_insert module=repo status=ok id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("item_insert", None, started_at, err),
        }
        result
    }

    fn get(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.get()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn list_all(&self) -> StoreResult<Vec<Item>> {
        let started_at = Instant::now();
        let sql = format!("{ITEM_SELECT_SQL} ORDER BY id ASC;");
        let result = self
            .connect()
            .and_then(|conn| query_items(&conn, &sql, &[]));
        match &result {
            Ok(items) => debug!(
                "event=item_list module=repo status=ok count={} duration_ms={}",
                items.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("item_list", None, started_at, err),
        }
        result
    }

    fn update(&self, item: &Item) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = self.update_row(item);
        match &result {
            Ok(()) => info!(
                "event=item_update module=repo status=ok id={} duration_ms={}",
                item.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("item_update", Some(item.id), started_at, err),
        }
        result
    }

    fn delete(&self, id: ItemId) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = self.delete_row(id);
        match &result {
            Ok(()) => info!(
                "event=item_delete module=repo status=ok id={} duration_ms={}",
                id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("item_delete", Some(id), started_at, err),
        }
        result
    }

    fn search(&self, term: &str) -> StoreResult<Vec<Item>> {
        let started_at = Instant::now();
        let needle = term.to_lowercase();
        let sql = format!(
            "{ITEM_SELECT_SQL}
             WHERE instr({CASEFOLD_FN}(name), ?1) > 0
                OR instr({CASEFOLD_FN}(category), ?1) > 0
             ORDER BY id ASC;"
        );
        let result = self
            .connect()
            .and_then(|conn| query_items(&conn, &sql, &[&needle as &dyn ToSql]));
        match &result {
            Ok(items) => debug!(
                "event=item_search module=repo status=ok count={} duration_ms={}",
                items.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("item_search", None, started_at, err),
        }
        result
    }
}

impl SqliteItemStore {
    fn insert_row(&self, item: &NewItem) -> StoreResult<ItemId> {
        item.validate()?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO items (name, category, quantity, price)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.name.as_str(),
                item.category.as_str(),
                i64::from(item.quantity),
                item.price,
            ],
        )?;
        Ok(ItemId(conn.last_insert_rowid()))
    }

    fn update_row(&self, item: &Item) -> StoreResult<()> {
        item.validate()?;
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE items
             SET
                name = ?1,
                category = ?2,
                quantity = ?3,
                price = ?4
             WHERE id = ?5;",
            params![
                item.name.as_str(),
                item.category.as_str(),
                i64::from(item.quantity),
                item.price,
                item.id.get(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(item.id));
        }
        Ok(())
    }

    fn delete_row(&self, id: ItemId) -> StoreResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM items WHERE id = ?1;", [id.get()])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn query_items(
    conn: &Connection,
    sql: &str,
    bind: &[&dyn ToSql],
) -> StoreResult<Vec<Item>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(bind)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_item_row(row)?);
    }
    Ok(items)
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<Item> {
    let id = ItemId(row.get("id")?);
    let raw_quantity: i64 = row.get("quantity")?;
    let quantity = u32::try_from(raw_quantity).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid quantity `{raw_quantity}` in items.quantity for id {id}"
        ))
    })?;

    let item = Item {
        id,
        name: row.get("name")?,
        category: row.get("category")?,
        quantity,
        price: row.get("price")?,
    };
    item.validate().map_err(|err| {
        StoreError::InvalidData(format!("row {id} violates item invariant: {err}"))
    })?;
    Ok(item)
}

fn log_failure(event: &str, id: Option<ItemId>, started_at: Instant, err: &StoreError) {
    let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let duration_ms = started_at.elapsed().as_millis();
    match err {
        StoreError::NotFound(_) => info!(
            "event={event} module=repo status=not_found id={id} duration_ms={duration_ms}"
        ),
        StoreError::Validation(_) => info!(
            "event={event} module=repo status=rejected id={id} duration_ms={duration_ms} error={err}"
        ),
        StoreError::Db(_) | StoreError::InvalidData(_) => error!(
            "event={event} module=repo status=error id={id} duration_ms={duration_ms} error={err}"
        ),
    }
}
