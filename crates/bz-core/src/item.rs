//! Catalogue item types.

use serde::{Deserialize, Serialize};

use crate::{Error, ItemId, Result};

/// A stored catalogue entry.
///
/// `image` is the filename returned by the image store, never raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub image: String,
}

/// Payload for inserting a new item. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub image: String,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            image: image.into(),
        }
    }

    /// Check that every field is non-empty.
    ///
    /// Repositories call this before writing so an invalid item can never be
    /// persisted, whichever layer built it.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation("name is required".into()));
        }
        if self.category.is_empty() {
            return Err(Error::Validation("category is required".into()));
        }
        if self.image.is_empty() {
            return Err(Error::Validation("image is required".into()));
        }
        Ok(())
    }

    /// Attach a backend-assigned id.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            image: self.image,
        }
    }
}
