//! Category lookup and get-or-create.

use bz_core::{Error, Result};
use rusqlite::Connection;

use crate::models::Category;

/// Return the id of the category called `name`, creating it if absent.
///
/// A single upsert against the `UNIQUE(name)` column, so two connections
/// creating the same new category concurrently still end up with one row.
/// The no-op `DO UPDATE` makes `RETURNING` yield the existing id on conflict.
pub fn get_or_create(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row(
        "INSERT INTO categories (name) VALUES (?1)
         ON CONFLICT(name) DO UPDATE SET name = excluded.name
         RETURNING id",
        [name],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// List all categories ordered by id.
pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM categories ORDER BY id")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Category::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{init_memory_pool, init_pool, PoolOptions};
    use std::sync::{Arc, Barrier};

    #[test]
    fn get_or_create_dedup() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = get_or_create(&conn, "phone").unwrap();
        let b = get_or_create(&conn, "phone").unwrap();
        assert_eq!(a, b);

        let c = get_or_create(&conn, "fashion").unwrap();
        assert_ne!(a, c);
        assert_eq!(list_categories(&conn).unwrap().len(), 2);
    }

    #[test]
    fn names_are_case_sensitive() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let lower = get_or_create(&conn, "phone").unwrap();
        let upper = get_or_create(&conn, "Phone").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn list_returns_created_rows_in_id_order() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let books = get_or_create(&conn, "books").unwrap();
        let toys = get_or_create(&conn, "toys").unwrap();
        get_or_create(&conn, "books").unwrap();

        assert_eq!(
            list_categories(&conn).unwrap(),
            vec![
                Category { id: books, name: "books".into() },
                Category { id: toys, name: "toys".into() },
            ]
        );
    }

    #[test]
    fn concurrent_creation_yields_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_pool(
            &dir.path().join("bazaar.sqlite3"),
            PoolOptions {
                max_size: 8,
                ..PoolOptions::default()
            },
        )
        .unwrap();

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    let conn = pool.get().unwrap();
                    barrier.wait();
                    get_or_create(&conn, "kitchen")
                })
            })
            .collect();

        let ids: Vec<i64> = handles
            .into_iter()
            .map(|h| h.join().unwrap().expect("every concurrent upsert succeeds"))
            .collect();
        assert_eq!(ids.len(), 8);
        assert!(ids.windows(2).all(|w| w[0] == w[1]));

        let conn = pool.get().unwrap();
        assert_eq!(list_categories(&conn).unwrap().len(), 1);
    }
}
