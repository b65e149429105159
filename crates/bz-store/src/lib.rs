//! bz-store: filesystem-backed persistence.
//!
//! - [`ImageStore`]: content-addressed image blobs named by SHA-256 digest.
//! - [`JsonItemRepository`]: the document-backed [`bz_core::ItemRepository`],
//!   a single JSON array rewritten on every insert.
//!
//! Both write through [`atomic::write_atomic`], so readers never observe a
//! half-written file under its final name.

pub mod atomic;
pub mod document;
pub mod images;

pub use document::JsonItemRepository;
pub use images::{ImageLookup, ImageStore};
