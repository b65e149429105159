//! Rust structs mapping to database rows.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use bz_core::{Item, ItemId};

/// Row of the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

/// Build an [`Item`] from a row of `items` joined to `categories`.
///
/// Column order must match [`crate::queries::items`]' `COLS`.
pub fn item_from_row(row: &rusqlite::Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: ItemId::new(row.get(0)?),
        name: row.get(1)?,
        category: row.get(2)?,
        image: row.get(3)?,
    })
}
