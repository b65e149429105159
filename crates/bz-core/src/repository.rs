//! The [`ItemRepository`] trait defining the storage contract for items.

use crate::{Item, NewItem, Result};

/// Persistent item storage.
///
/// Two implementations exist: a relational one (`bz_db`) and a JSON document
/// one (`bz_store`). The server picks one at startup and shares it as an
/// `Arc<dyn ItemRepository>`, so implementations must be `Send + Sync`.
///
/// All methods are blocking; async callers should wrap them in
/// `spawn_blocking`.
pub trait ItemRepository: Send + Sync {
    /// Short name of the backend, used in logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    /// Persist a new item and return it with its assigned id.
    ///
    /// Fails with [`Error::Validation`](crate::Error::Validation) when a field
    /// is empty. If the write fails, no item with this payload is visible
    /// afterwards.
    fn insert(&self, item: &NewItem) -> Result<Item>;

    /// Return every stored item.
    ///
    /// An empty store, including one that was never written, yields an
    /// empty vector rather than an error.
    fn list_items(&self) -> Result<Vec<Item>>;

    /// Look up one item by its textual id.
    ///
    /// Fails with [`Error::Validation`](crate::Error::Validation) when `id` is
    /// not a valid id for this backend and with
    /// [`Error::NotFound`](crate::Error::NotFound) when nothing matches.
    fn get_item(&self, id: &str) -> Result<Item>;

    /// Return items whose name contains `keyword` (case-sensitive).
    fn search_items(&self, keyword: &str) -> Result<Vec<Item>>;
}
