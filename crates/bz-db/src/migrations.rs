//! Embedded SQL migrations, the migration runner, and the optional external
//! schema script.
//!
//! Migrations are stored as `&str` constants and executed in order. A
//! `schema_migrations` table tracks which versions have been applied.

use std::path::Path;

use bz_core::{Error, Result};
use rusqlite::Connection;

/// V1: initial schema -- categories and items.
///
/// `IF NOT EXISTS` lets a database previously created by the external schema
/// script (`db/items.sql`) adopt the migration table without failing.
const V1_INITIAL: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    image_name  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_category_id ON items(category_id);
"#;

/// V2: enforce unique category names.
///
/// V1 adopts a pre-existing `categories` table as-is, and older schemas had
/// no constraint on `name`. Duplicate rows are folded into the lowest id
/// first so the index can be built; the category upsert depends on it.
const V2_UNIQUE_CATEGORY_NAMES: &str = r#"
UPDATE items
SET category_id = (
    SELECT MIN(dup.id)
    FROM categories AS cur
    JOIN categories AS dup ON dup.name = cur.name
    WHERE cur.id = items.category_id
)
WHERE category_id IN (SELECT id FROM categories);

DELETE FROM categories
WHERE id NOT IN (SELECT MIN(id) FROM categories GROUP BY name);

CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_name ON categories(name);
"#;

/// Ordered list of `(version, sql)` pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL), (2, V2_UNIQUE_CATEGORY_NAMES)];

/// Apply every migration that has not been recorded yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit().map_err(|e| Error::database(e.to_string()))?;

        tracing::debug!(version, "Applied migration");
    }

    Ok(())
}

/// Execute an externally supplied schema script in a single transaction.
///
/// The script runs on every startup, so it must be idempotent
/// (`CREATE TABLE IF NOT EXISTS ...`).
pub fn run_schema_script(conn: &Connection, path: &Path) -> Result<()> {
    let sql = std::fs::read_to_string(path)?;

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    tx.execute_batch(&sql).map_err(|e| {
        Error::database(format!("Schema script {} failed: {e}", path.display()))
    })?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    tracing::info!(path = %path.display(), "Applied schema script");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_category_names_are_unique() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute("INSERT INTO categories (name) VALUES ('phone')", [])
            .unwrap();
        let dup = conn.execute("INSERT INTO categories (name) VALUES ('phone')", []);
        assert!(dup.is_err());
    }

    #[test]
    fn test_legacy_schema_gets_unique_names() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE categories (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
             CREATE TABLE items (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT NOT NULL,
                 category_id INTEGER NOT NULL,
                 image_name TEXT NOT NULL
             );
             INSERT INTO categories (name) VALUES ('phone'), ('phone'), ('books');
             INSERT INTO items (name, category_id, image_name)
                 VALUES ('iPhone', 1, 'a.jpg'), ('Pixel', 2, 'b.jpg'), ('Novel', 3, 'c.jpg');",
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let categories: Vec<(i64, String)> = conn
            .prepare("SELECT id, name FROM categories ORDER BY id")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(categories, vec![(1, "phone".to_string()), (3, "books".to_string())]);

        let pixel_category: i64 = conn
            .query_row("SELECT category_id FROM items WHERE name = 'Pixel'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(pixel_category, 1);

        let dup = conn.execute("INSERT INTO categories (name) VALUES ('books')", []);
        assert!(dup.is_err());
    }

    #[test]
    fn test_schema_script_after_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("items.sql");
        std::fs::write(
            &script,
            "CREATE TABLE IF NOT EXISTS categories (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT NOT NULL UNIQUE
             );
             CREATE TABLE IF NOT EXISTS audit (note TEXT);",
        )
        .unwrap();

        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_schema_script(&conn, &script).unwrap();
        run_schema_script(&conn, &script).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='audit'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_schema_script_missing_file() {
        let conn = Connection::open_in_memory().unwrap();
        let err = run_schema_script(&conn, Path::new("/nonexistent/items.sql")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_schema_script_syntax_error_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("broken.sql");
        std::fs::write(&script, "CREATE TABLE first (x TEXT); CREATE TABL oops;").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        let err = run_schema_script(&conn, &script).unwrap_err();
        assert!(matches!(err, Error::Database { .. }));

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name='first'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }
}
