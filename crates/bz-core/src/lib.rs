//! bz-core: shared types, errors, configuration, and the item repository
//! contract.
//!
//! Every other bz-* crate depends on this one. Storage backends implement
//! [`ItemRepository`]; the server only ever talks to the trait object.

pub mod config;
pub mod error;
pub mod ids;
pub mod item;
pub mod repository;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::ItemId;
pub use item::{Item, NewItem};
pub use repository::ItemRepository;
