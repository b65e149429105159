//! Application context shared across route handlers via Axum state.

use std::path::Path;
use std::sync::Arc;

use bz_core::config::{Backend, Config, StorageConfig};
use bz_core::{ItemRepository, Result};
use bz_db::pool::PoolOptions;
use bz_db::SqliteItemRepository;
use bz_store::{ImageStore, JsonItemRepository};

/// Everything a handler needs. Cheap to clone; all fields are `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable startup configuration.
    pub config: Arc<Config>,
    /// The item repository selected by `storage.backend`.
    pub items: Arc<dyn ItemRepository>,
    /// Content-addressed image blobs.
    pub images: Arc<ImageStore>,
}

impl AppContext {
    pub fn new(config: Config, items: Arc<dyn ItemRepository>, images: ImageStore) -> Self {
        Self {
            config: Arc::new(config),
            items,
            images: Arc::new(images),
        }
    }

    /// Open the configured repository and image store.
    pub fn open(config: Config) -> Result<Self> {
        let items = open_repository(&config.storage)?;
        let images = ImageStore::open(
            &config.storage.image_dir,
            config.storage.default_image.clone(),
        )?;
        Ok(Self::new(config, items, images))
    }
}

/// Construct the item repository named by `storage.backend`.
pub fn open_repository(storage: &StorageConfig) -> Result<Arc<dyn ItemRepository>> {
    match storage.backend {
        Backend::Sqlite => {
            let repo = SqliteItemRepository::open(
                &storage.db_path,
                storage.schema_path.as_deref(),
                PoolOptions::from(storage),
            )?;
            Ok(Arc::new(repo))
        }
        Backend::Json => {
            ensure_parent_dir(&storage.items_path)?;
            tracing::info!("Item document at {}", storage.items_path.display());
            Ok(Arc::new(JsonItemRepository::new(&storage.items_path)))
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
