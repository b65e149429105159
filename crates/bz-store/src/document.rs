//! Document-backed [`ItemRepository`]: one JSON array on disk.
//!
//! Every insert reads the whole array, appends, and rewrites the file. Item
//! ids are 1-based positions in that array, so they are only stable as long
//! as nothing is ever removed.

use std::path::{Path, PathBuf};

use bz_core::{Error, Item, ItemId, ItemRepository, NewItem, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::atomic::write_atomic;

/// On-disk shape of one entry. The id is positional and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredItem {
    name: String,
    category: String,
    image: String,
}

impl From<&NewItem> for StoredItem {
    fn from(item: &NewItem) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            image: item.image.clone(),
        }
    }
}

impl StoredItem {
    fn into_item(self, index: usize) -> Item {
        Item {
            id: ItemId::new(index as i64 + 1),
            name: self.name,
            category: self.category,
            image: self.image,
        }
    }
}

/// Item repository persisting a JSON array at a single path.
pub struct JsonItemRepository {
    path: PathBuf,
    /// Serializes read-modify-write cycles; without it two concurrent
    /// inserts could each rewrite the file and one item would be lost.
    write_lock: Mutex<()>,
}

impl JsonItemRepository {
    /// Create a repository for the document at `path`. The file is created on
    /// the first insert; its parent directory must exist by then.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full snapshot. A missing file, a zero-length file and a JSON
    /// `null` are all an empty collection; anything else that fails to parse
    /// is an error.
    fn load(&self) -> Result<Vec<StoredItem>> {
        let contents = match std::fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let items: Option<Vec<StoredItem>> = serde_json::from_slice(&contents)
            .map_err(|e| Error::Malformed(format!("{}: {e}", self.path.display())))?;
        Ok(items.unwrap_or_default())
    }

    fn save(&self, items: &[StoredItem]) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(items)
            .map_err(|e| Error::Internal(format!("Failed to serialize items: {e}")))?;
        json.push(b'\n');
        write_atomic(&self.path, &json)
    }

    fn load_items(&self) -> Result<Vec<Item>> {
        Ok(self
            .load()?
            .into_iter()
            .enumerate()
            .map(|(i, stored)| stored.into_item(i))
            .collect())
    }
}

impl ItemRepository for JsonItemRepository {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    fn insert(&self, item: &NewItem) -> Result<Item> {
        item.validate()?;

        let _guard = self.write_lock.lock();
        let mut items = self.load()?;
        items.push(StoredItem::from(item));
        self.save(&items)?;

        Ok(item.clone().into_item(ItemId::new(items.len() as i64)))
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        self.load_items()
    }

    fn get_item(&self, id: &str) -> Result<Item> {
        let id: ItemId = id.parse()?;
        let index = id
            .get()
            .checked_sub(1)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| Error::not_found("item", id))?;

        self.load()?
            .into_iter()
            .nth(index)
            .map(|stored| stored.into_item(index))
            .ok_or_else(|| Error::not_found("item", id))
    }

    fn search_items(&self, keyword: &str) -> Result<Vec<Item>> {
        Ok(self
            .load_items()?
            .into_iter()
            .filter(|item| item.name.contains(keyword))
            .collect())
    }
}
