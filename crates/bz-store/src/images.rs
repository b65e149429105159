//! Content-addressed image storage.
//!
//! Blobs live flat under the store root, named by the lowercase hex SHA-256
//! of their bytes plus a `.jpg` extension. Identical uploads always map to
//! the same file, which is written at most once.

use std::path::{Component, Path, PathBuf};

use bz_core::{Error, Result};
use sha2::{Digest, Sha256};

use crate::atomic::write_atomic;

/// Extension appended to every stored blob.
pub const IMAGE_EXTENSION: &str = ".jpg";

/// Suffixes accepted when resolving a requested filename.
pub const ALLOWED_SUFFIXES: &[&str] = &[".jpg", ".jpeg"];

/// Outcome of resolving a requested image name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup {
    /// The blob exists at this path.
    Found(PathBuf),
    /// The name is valid but nothing is stored under it.
    Missing(PathBuf),
}

/// Filesystem manager for content-addressed images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    default_image: String,
}

impl ImageStore {
    /// Create a store rooted at `root` without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>, default_image: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_image: default_image.into(),
        }
    }

    /// Create a store and make sure its root directory exists.
    pub fn open(root: impl Into<PathBuf>, default_image: impl Into<String>) -> Result<Self> {
        let store = Self::new(root, default_image);
        std::fs::create_dir_all(&store.root)?;
        Ok(store)
    }

    /// Directory holding the blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `data` and return its content-derived filename.
    ///
    /// If a blob with that name already exists nothing is written; callers
    /// must not assume the bytes were (re)written. New blobs are written to a
    /// temporary file and renamed into place, so a failed write never leaves
    /// a partial file under the final name.
    pub fn put(&self, data: &[u8]) -> Result<String> {
        let filename = content_filename(data);
        let path = self.root.join(&filename);

        if path.exists() {
            tracing::debug!(filename = %filename, "Image already stored");
            return Ok(filename);
        }

        write_atomic(&path, data)?;
        tracing::debug!(filename = %filename, bytes = data.len(), "Stored image");
        Ok(filename)
    }

    /// Validate a requested filename and check whether it is stored.
    ///
    /// Validation happens before any filesystem access: names that could
    /// escape the root or lack an allowed suffix fail with
    /// [`Error::Validation`]. A valid but absent name yields
    /// [`ImageLookup::Missing`].
    pub fn resolve(&self, filename: &str) -> Result<ImageLookup> {
        validate_filename(filename)?;

        let path = self.root.join(filename);
        if path.is_file() {
            Ok(ImageLookup::Found(path))
        } else {
            Ok(ImageLookup::Missing(path))
        }
    }

    /// Path of the fallback image served in place of missing blobs.
    pub fn default_image_path(&self) -> PathBuf {
        self.root.join(&self.default_image)
    }
}

/// Compute the stored filename for `data`: hex SHA-256 plus extension.
pub fn content_filename(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    format!("{}{IMAGE_EXTENSION}", hex::encode(digest))
}

/// Check that `filename` names a single image file directly under the root.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(Error::Validation("filename is required".into()));
    }

    // Reject separators outright so the check is the same on every platform.
    if filename.contains(['/', '\\']) {
        return Err(Error::Validation(format!("invalid image path: {filename}")));
    }

    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(Error::Validation(format!("invalid image path: {filename}"))),
    }

    if !ALLOWED_SUFFIXES.iter().any(|suffix| filename.ends_with(suffix)) {
        return Err(Error::Validation(format!(
            "image path does not end with .jpg or .jpeg: {filename}"
        )));
    }

    Ok(())
}
