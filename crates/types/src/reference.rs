//! Precomputed domain reference points.
//!
//! Consumed as ground truth: nothing here checks that the frontier really is
//! Pareto-efficient or that the Nash and Kalai points lie on it.

use serde::{Deserialize, Serialize};

use crate::trace::Bid;
use crate::utility::UtilityPair;

/// A bid together with its seat-ordered utility pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    #[serde(default)]
    pub bid: Bid,
    pub utility: UtilityPair,
}

impl ReferencePoint {
    pub fn at(utility: UtilityPair) -> Self {
        Self {
            bid: Bid::default(),
            utility,
        }
    }
}

/// Reference solutions for one bidding domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainReference {
    /// Cardinality of the bidding space.
    #[serde(default)]
    pub size: u64,
    pub pareto_front: Vec<ReferencePoint>,
    pub nash: ReferencePoint,
    pub kalai: ReferencePoint,
}

impl DomainReference {
    /// Utility pairs on the Pareto frontier.
    pub fn frontier(&self) -> impl Iterator<Item = UtilityPair> + '_ {
        self.pareto_front.iter().map(|point| point.utility)
    }

    pub fn nash_point(&self) -> UtilityPair {
        self.nash.utility
    }

    pub fn kalai_point(&self) -> UtilityPair {
        self.kalai.utility
    }
}
