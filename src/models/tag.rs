//! Clan tag normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized clan tag: trimmed and `#`-prefixed. Case is preserved.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClanTag(String);

impl ClanTag {
    /// Normalize user input into a tag.
    /// Returns `None` when nothing remains after trimming.
    pub fn normalize(raw: &str) -> Option<Self> {
        let tag = raw.trim();
        if tag.is_empty() {
            return None;
        }

        if tag.starts_with('#') {
            Some(Self(tag.to_string()))
        } else {
            Some(Self(format!("#{}", tag)))
        }
    }

    /// Get the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encoded form for transport (`#` becomes `%23`).
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for ClanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ClanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClanTag({})", self.0)
    }
}
