//! Identifier types for the analytics pipeline.
//!
//! Actor identifiers are only meaningful inside the trace that produced them;
//! domain identifiers and session ordinals are stable across repeated runs.

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// =============================================================================
// Actor Identifier
// =============================================================================

/// Raw actor identifier as written in a negotiation trace.
///
/// Embeds a stable seat marker plus a volatile per-run instance suffix, so
/// the same agent gets a different id in every run. Never compare across traces.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From, Into,
)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display name: the last two `_`-separated tokens of the id.
    ///
    /// Ids with fewer than two tokens are returned whole.
    pub fn display_name(&self) -> String {
        let tokens: Vec<&str> = self.0.split('_').collect();
        if tokens.len() < 2 {
            return self.0.clone();
        }
        tokens[tokens.len() - 2..].join("_")
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Domain Identifier
// =============================================================================

/// Identifier of a bidding domain (e.g. `domain07`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From, Into,
)]
#[serde(transparent)]
pub struct DomainId(pub String);

impl DomainId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the domain from a preference-profile reference.
    ///
    /// The domain is the directory holding the profile file, after stripping an
    /// optional `file:` scheme: `file:domains/domain07/profileA.json` -> `domain07`.
    pub fn from_profile_path(profile: &str) -> Option<Self> {
        let path = profile.strip_prefix("file:").unwrap_or(profile);
        let name = Path::new(path).parent()?.file_name()?.to_str()?;
        if name.is_empty() {
            return None;
        }
        Some(Self(name.to_string()))
    }
}

impl From<&str> for DomainId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Session Ordinal
// =============================================================================

/// Position of a session within one tournament's list of matchups.
///
/// The same ordinal names the same matchup in every repeated execution of a
/// tournament configuration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
#[serde(transparent)]
pub struct Ordinal(pub u32);

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
