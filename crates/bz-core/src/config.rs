//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server and storage sections. Every section defaults sensibly so a
//! completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Result;
use crate::Error;

/// Environment variable naming the only origin allowed by CORS.
pub const FRONT_URL_ENV: &str = "FRONT_URL";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Read and parse a config file, failing on any error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Overlay settings taken from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay settings using `lookup` in place of the process environment.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(FRONT_URL_ENV) {
            self.server.front_url = url;
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.front_url.trim().is_empty() {
            warnings.push("server.front_url is empty; cross-origin requests will be refused".into());
        }

        if self.server.max_upload_bytes == 0 {
            warnings.push("server.max_upload_bytes is 0; every upload will be rejected".into());
        }

        let default_image = self.storage.default_image.to_ascii_lowercase();
        if !default_image.ends_with(".jpg") && !default_image.ends_with(".jpeg") {
            warnings.push(format!(
                "storage.default_image '{}' is not a .jpg/.jpeg file",
                self.storage.default_image
            ));
        }

        if self.storage.backend == Backend::Sqlite && self.storage.db_pool_size == 0 {
            warnings.push("storage.db_pool_size is 0; the database cannot be opened".into());
        }

        if self.storage.backend == Backend::Sqlite && self.storage.db_busy_timeout_ms == 0 {
            warnings.push(
                "storage.db_busy_timeout_ms is 0; concurrent inserts may fail with \"database is locked\""
                    .into(),
            );
        }

        if self.storage.backend == Backend::Json && self.storage.schema_path.is_some() {
            warnings.push("storage.schema_path is ignored by the json backend".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed to make cross-origin requests.
    pub front_url: String,
    /// Upper bound on request bodies, which caps uploaded image size.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 9000,
            front_url: "http://localhost:3000".into(),
            max_upload_bytes: 10 << 20,
        }
    }
}

/// Which item repository implementation to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// SQLite with a normalized categories table.
    #[default]
    Sqlite,
    /// A single JSON array rewritten on every insert.
    Json,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Json => write!(f, "json"),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "json" => Ok(Backend::Json),
            other => Err(Error::Validation(format!(
                "unknown storage backend '{other}' (valid: sqlite, json)"
            ))),
        }
    }
}

/// Item and image persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    /// Directory holding content-addressed image blobs.
    pub image_dir: PathBuf,
    /// Filename (inside `image_dir`) served when a requested image is missing.
    pub default_image: String,
    /// SQLite database file for the `sqlite` backend.
    pub db_path: PathBuf,
    /// Optional SQL script executed once at startup by the `sqlite` backend.
    pub schema_path: Option<PathBuf>,
    /// JSON document for the `json` backend.
    pub items_path: PathBuf,
    /// Maximum number of pooled SQLite connections.
    pub db_pool_size: u32,
    /// How long a connection waits on a locked database before failing.
    pub db_busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            image_dir: PathBuf::from("images"),
            default_image: "default.jpg".into(),
            db_path: PathBuf::from("db/bazaar.sqlite3"),
            schema_path: None,
            items_path: PathBuf::from("items.json"),
            db_pool_size: 4,
            db_busy_timeout_ms: 5_000,
        }
    }
}
