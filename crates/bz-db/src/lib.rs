//! bz-db: relational item storage.
//!
//! SQLite via rusqlite with r2d2 connection pooling, embedded migrations,
//! per-table query modules, and [`SqliteItemRepository`], the relational
//! implementation of [`bz_core::ItemRepository`].

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod repository;

pub use repository::SqliteItemRepository;
