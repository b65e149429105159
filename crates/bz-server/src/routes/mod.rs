//! Route handlers for the HTTP API.

pub mod health;
pub mod images;
pub mod items;
pub mod search;

use bz_core::{Error, Result};

/// Run blocking repository or filesystem work off the async executor.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("spawn_blocking join error: {e}")))?
}
