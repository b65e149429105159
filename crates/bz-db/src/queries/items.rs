//! Item insert, lookup, list, and search operations.

use bz_core::{Error, Item, ItemId, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::item_from_row;

/// Column list used in SELECT statements (items joined to categories).
const COLS: &str = "items.id, items.name, categories.name, items.image_name";

/// Join clause shared by every read.
const FROM: &str = "items JOIN categories ON categories.id = items.category_id";

/// Insert an item row referencing an existing category.
pub fn insert_item(
    conn: &Connection,
    name: &str,
    category_id: i64,
    image_name: &str,
) -> Result<ItemId> {
    conn.execute(
        "INSERT INTO items (name, category_id, image_name) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, category_id, image_name],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(ItemId::new(conn.last_insert_rowid()))
}

/// Get an item by ID.
pub fn get_item(conn: &Connection, id: ItemId) -> Result<Option<Item>> {
    let q = format!("SELECT {COLS} FROM {FROM} WHERE items.id = ?1");
    conn.query_row(&q, [id.get()], item_from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))
}

/// List all items in id order.
pub fn list_items(conn: &Connection) -> Result<Vec<Item>> {
    let q = format!("SELECT {COLS} FROM {FROM} ORDER BY items.id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], item_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Find items whose name contains `keyword`.
///
/// Uses `instr` rather than `LIKE`: SQLite's `LIKE` folds ASCII case and
/// treats `%`/`_` as wildcards, while this must be a literal, case-sensitive
/// substring match.
pub fn search_items(conn: &Connection, keyword: &str) -> Result<Vec<Item>> {
    let q = format!(
        "SELECT {COLS} FROM {FROM}
         WHERE instr(items.name, ?1) > 0
         ORDER BY items.id ASC"
    );
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([keyword], item_from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Count item rows.
pub fn count_items(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}
