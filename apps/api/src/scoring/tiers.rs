//! Maturity tiers and the boundary rules that classify normalized scores.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maturity tier in ascending order. `Optimizing` is the top tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Tier {
    Responding,
    Building,
    Optimizing,
}

impl Tier {
    /// All tiers, ascending maturity.
    pub const ALL: [Tier; 3] = [Tier::Responding, Tier::Building, Tier::Optimizing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Responding => "Responding",
            Tier::Building => "Building",
            Tier::Optimizing => "Optimizing",
        }
    }

    /// Parses a canonical tier name, e.g. from a reference-table key.
    pub fn from_name(name: &str) -> Option<Tier> {
        match name {
            "Responding" => Some(Tier::Responding),
            "Building" => Some(Tier::Building),
            "Optimizing" => Some(Tier::Optimizing),
            _ => None,
        }
    }

    /// Priority areas are everything below the top tier.
    pub fn is_priority(&self) -> bool {
        *self != Tier::Optimizing
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier boundaries in ascending order. Each entry holds the inclusive upper
/// bound of that tier's score band; a score above every bound classifies as
/// the top tier.
///
/// The bounds must partition [0, 1] with no reachable gaps under two-decimal
/// rounding. That invariant is validated when the reference data loads, not
/// re-checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct TierBoundaries {
    bounds: Vec<(Tier, f64)>,
}

impl TierBoundaries {
    /// Bounds must already be in ascending tier order with ascending uppers;
    /// reference-data loading enforces this before construction.
    pub fn new(bounds: Vec<(Tier, f64)>) -> Self {
        Self { bounds }
    }

    /// Classifies a normalized score.
    ///
    /// Upper bounds are inclusive: a score exactly at a tier's upper bound
    /// classifies into that tier, not the next one up. Total over any input;
    /// scores above every bound map to the top tier.
    pub fn classify(&self, score: f64) -> Tier {
        for (tier, upper) in &self.bounds {
            if score <= *upper {
                return *tier;
            }
        }
        self.bounds
            .last()
            .map(|(tier, _)| *tier)
            .unwrap_or(Tier::Optimizing)
    }
}
