//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds a full [`AppContext`] for either
//! storage backend inside a temporary directory. [`TestHarness::with_server`]
//! starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bz_core::config::{Backend, Config, StorageConfig};
use bz_core::ItemRepository;
use bz_db::pool::PoolOptions;
use bz_db::SqliteItemRepository;
use bz_server::context::AppContext;
use bz_server::router::build_router;
use bz_store::{ImageStore, JsonItemRepository};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

/// Both backends, for tests that must behave identically on each.
pub const BACKENDS: [Backend; 2] = [Backend::Sqlite, Backend::Json];

/// Bytes written as the fallback image.
pub const DEFAULT_IMAGE: &[u8] = b"default image bytes";

/// Test harness wrapping a fully-constructed [`AppContext`] whose files live
/// in a temporary directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub backend: Backend,
    dir: TempDir,
}

impl TestHarness {
    /// Create a harness for `backend` with default configuration. The
    /// relational backend gets a fresh database file initialised with the
    /// shipped schema script.
    pub fn new(backend: Backend) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = Config {
            storage: StorageConfig {
                backend,
                image_dir: dir.path().join("images"),
                items_path: dir.path().join("items.json"),
                db_path: dir.path().join("bazaar.sqlite3"),
                ..StorageConfig::default()
            },
            ..Config::default()
        };

        let items: Arc<dyn ItemRepository> = match backend {
            Backend::Sqlite => {
                let schema = Path::new(env!("CARGO_MANIFEST_DIR")).join("db/items.sql");
                let repo = SqliteItemRepository::open(
                    &config.storage.db_path,
                    Some(schema.as_path()),
                    PoolOptions::from(&config.storage),
                )
                .expect("failed to open database");
                Arc::new(repo)
            }
            Backend::Json => Arc::new(JsonItemRepository::new(&config.storage.items_path)),
        };
        let images = ImageStore::open(&config.storage.image_dir, "default.jpg")
            .expect("failed to open image store");

        let ctx = AppContext::new(config, items, images);
        Self { ctx, backend, dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server(backend: Backend) -> (Self, SocketAddr) {
        let harness = Self::new(backend);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn image_dir(&self) -> PathBuf {
        self.ctx.images.root().to_path_buf()
    }

    /// Put the fallback image in place.
    pub fn write_default_image(&self) {
        std::fs::write(self.ctx.images.default_image_path(), DEFAULT_IMAGE)
            .expect("failed to write default image");
    }

    /// Number of regular files in the image directory.
    pub fn blob_count(&self) -> usize {
        std::fs::read_dir(self.image_dir())
            .expect("failed to read image dir")
            .filter(|e| e.as_ref().map(|e| e.path().is_file()).unwrap_or(false))
            .count()
    }
}

/// Expected stored filename for `data`.
pub fn image_name(data: &[u8]) -> String {
    format!("{}.jpg", hex::encode(Sha256::digest(data)))
}

/// Build the multipart form `POST /items` expects.
pub fn item_form(name: &str, category: &str, image: &[u8]) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("name", name.to_string())
        .text("category", category.to_string())
        .part(
            "image",
            reqwest::multipart::Part::bytes(image.to_vec()).file_name("upload.jpg"),
        )
}

/// Submit an item and return the raw response.
pub async fn post_item(
    addr: SocketAddr,
    name: &str,
    category: &str,
    image: &[u8],
) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/items"))
        .multipart(item_form(name, category, image))
        .send()
        .await
        .expect("request failed")
}

/// Submit an item and assert it was accepted.
pub async fn add_item(addr: SocketAddr, name: &str, category: &str, image: &[u8]) {
    let resp = post_item(addr, name, category, image).await;
    assert_eq!(resp.status(), 200, "adding {name} failed");
}
