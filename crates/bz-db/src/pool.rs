//! SQLite connection pooling for the item database.
//!
//! Every connection handed out by the pool has foreign keys enabled and a
//! busy timeout, so writers that collide on the category upsert wait for the
//! lock instead of failing immediately. Migrations run once, when the pool is
//! created.

use std::path::Path;
use std::time::Duration;

use bz_core::config::StorageConfig;
use bz_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Size and lock-wait settings for a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_size: u32,
    pub busy_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_size: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&StorageConfig> for PoolOptions {
    fn from(storage: &StorageConfig) -> Self {
        Self {
            max_size: storage.db_pool_size,
            busy_timeout: Duration::from_millis(storage.db_busy_timeout_ms),
        }
    }
}

/// Per-connection setup shared by file and in-memory pools.
fn configure(conn: &mut Connection, busy_timeout: Duration, wal: bool) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    if wal {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
    }
    Ok(())
}

fn build(manager: SqliteConnectionManager, options: PoolOptions) -> Result<DbPool> {
    // r2d2 panics on a zero-sized pool; reject it as bad configuration.
    if options.max_size == 0 {
        return Err(Error::Validation("database pool size must be at least 1".into()));
    }

    let pool = Pool::builder()
        .max_size(options.max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;

    Ok(pool)
}

/// Open (creating if needed) the database file at `db_path`.
pub fn init_pool(db_path: &Path, options: PoolOptions) -> Result<DbPool> {
    let busy_timeout = options.busy_timeout;
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(move |conn| configure(conn, busy_timeout, true));

    let pool = build(manager, options)?;
    tracing::debug!(
        path = %db_path.display(),
        max_size = options.max_size,
        busy_timeout_ms = options.busy_timeout.as_millis() as u64,
        "Database pool ready"
    );
    Ok(pool)
}

/// Create a private in-memory database shared by all connections of the
/// returned pool. Intended for tests.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);

    let uri = format!(
        "file:bazaar_items_{}?mode=memory&cache=shared",
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );
    let options = PoolOptions::default();
    let manager = SqliteConnectionManager::file(uri)
        .with_init(move |conn| configure(conn, options.busy_timeout, false));

    build(manager, options)
}

/// Check a connection out of the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
