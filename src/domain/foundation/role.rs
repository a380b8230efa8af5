//! Marketplace role value object.
//!
//! The two sides of the marketplace are a closed set. Role text read back
//! from persistence is parsed at the domain edge; anything unrecognised is
//! handled by the gating destination table, never by string comparison
//! scattered through callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The side of the marketplace a user belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Creator,
    Brand,
}

impl Role {
    /// Canonical lowercase name, matching the persisted column value and the
    /// URL path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Creator => "creator",
            Role::Brand => "brand",
        }
    }

    /// Parses persisted role text, returning `None` for unrecognised values
    /// instead of an error so callers can apply the fail-safe destination.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "creator" => Some(Role::Creator),
            "brand" => Some(Role::Brand),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Error for role text outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);
