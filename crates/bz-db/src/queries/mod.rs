//! Database query modules.

pub mod categories;
pub mod items;
