//! Item identifiers.
//!
//! An [`ItemId`] is backend-assigned: the relational backend hands out
//! monotonic row ids, the document backend uses the 1-based position in the
//! current snapshot. The two schemes are not interchangeable, so an id is only
//! meaningful for the backend that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Identifier of a stored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Wrap a raw backend id.
    #[must_use]
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Return the raw integer value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| Error::Validation(format!("invalid item id: {s:?}")))
    }
}

impl From<i64> for ItemId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
