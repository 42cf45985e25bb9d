//! Membership tier model: the single source of truth for tier ordering.
//!
//! Every component that compares tiers routes through [`ORDER`] and
//! [`Tier::rank`] rather than holding its own copy of the sequence, so the
//! filter set, the upgrade menu, and the lock overlay can never drift apart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Membership level gating event visibility, ascending by privilege.
///
/// The set is closed: no other values are valid, and comparison is always by
/// rank, never lexical. Serialized lowercase both on the wire and in the
/// `tier` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Silver,
    Gold,
    Platinum,
}

/// Canonical tier sequence, lowest privilege first.
pub const ORDER: [Tier; 4] = [Tier::Free, Tier::Silver, Tier::Gold, Tier::Platinum];

/// Error for a tier value outside the valid set.
#[derive(Debug, Error)]
#[error("unknown tier: {0}")]
pub struct ParseTierError(String);

impl Tier {
    /// Zero-based position within [`ORDER`].
    pub fn rank(self) -> usize {
        match self {
            Tier::Free => 0,
            Tier::Silver => 1,
            Tier::Gold => 2,
            Tier::Platinum => 3,
        }
    }

    /// Tiers whose events a member at `self` may see: the prefix of [`ORDER`]
    /// up to and including `self`.
    pub fn entitled(self) -> &'static [Tier] {
        &ORDER[..=self.rank()]
    }

    /// Strictly higher tiers this member could still move to. Empty at
    /// `platinum`, which is the terminal tier.
    pub fn upgrades(self) -> &'static [Tier] {
        &ORDER[self.rank() + 1..]
    }

    /// Lenient parse for provider-owned metadata: any value outside the valid
    /// set resolves to `free`. Unknown state must not be permissive.
    pub fn parse_lenient(value: &str) -> Tier {
        value.parse().unwrap_or(Tier::Free)
    }

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }
}

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Tier::Free),
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            "platinum" => Ok(Tier::Platinum),
            other => Err(ParseTierError(other.to_string())),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
