//! Relational [`ItemRepository`] backed by the SQLite pool.

use std::path::Path;

use bz_core::{Error, Item, ItemId, ItemRepository, NewItem, Result};

use crate::migrations;
use crate::pool::{self, DbPool, PoolOptions};
use crate::queries::{categories, items};

/// Item repository storing rows in `items` with a normalized `categories`
/// table. Ids are SQLite row ids.
#[derive(Clone)]
pub struct SqliteItemRepository {
    db: DbPool,
}

impl SqliteItemRepository {
    /// Wrap an already-initialized pool.
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Open (or create) the database at `db_path`, run migrations, and then
    /// the optional external schema script.
    pub fn open(
        db_path: &Path,
        schema_path: Option<&Path>,
        options: PoolOptions,
    ) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                tracing::info!("Created database directory {}", parent.display());
            }
        }

        let db = pool::init_pool(db_path, options)?;
        let conn = pool::get_conn(&db)?;
        if let Some(script) = schema_path {
            migrations::run_schema_script(&conn, script)?;
        }

        let item_count = items::count_items(&conn)?;
        let category_count = categories::list_categories(&conn)?.len();
        tracing::info!(
            items = item_count,
            categories = category_count,
            "Opened item database at {}",
            db_path.display()
        );
        drop(conn);

        Ok(Self { db })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.db
    }
}

impl ItemRepository for SqliteItemRepository {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn insert(&self, item: &NewItem) -> Result<Item> {
        item.validate()?;

        let conn = pool::get_conn(&self.db)?;
        // Category upsert and item row commit together or not at all.
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        let category_id = categories::get_or_create(&tx, &item.category)?;
        let id = items::insert_item(&tx, &item.name, category_id, &item.image)?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        Ok(item.clone().into_item(id))
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        let conn = pool::get_conn(&self.db)?;
        items::list_items(&conn)
    }

    fn get_item(&self, id: &str) -> Result<Item> {
        let id: ItemId = id.parse()?;
        let conn = pool::get_conn(&self.db)?;
        items::get_item(&conn, id)?.ok_or_else(|| Error::not_found("item", id))
    }

    fn search_items(&self, keyword: &str) -> Result<Vec<Item>> {
        let conn = pool::get_conn(&self.db)?;
        items::search_items(&conn, keyword)
    }
}
