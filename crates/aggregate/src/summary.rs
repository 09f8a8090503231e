//! Averaged views of group totals.
//!
//! Every average falls back to 0 when its divisor is 0. Counts are reported
//! as-is so readers can tell an empty group from a group of zeros.

use serde::Serialize;
use types::{BehaviorSensitivity, DomainId, MoveClass, PerSeat, UtilityPair};

use crate::accumulator::{BehaviorTotals, GroupTotals, OutcomeTotals};

fn mean(sum: f64, count: u32) -> f64 {
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}

/// Averaged outcome quality, given agreement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeSummary {
    pub num_runs: u32,
    pub num_agreements: u32,
    pub num_referenced_agreements: u32,
    pub num_excluded: u32,
    pub utility: UtilityPair,
    pub distance_to_nash: f64,
    pub distance_to_kalai: f64,
}

impl From<&OutcomeTotals> for OutcomeSummary {
    fn from(totals: &OutcomeTotals) -> Self {
        Self {
            num_runs: totals.runs,
            num_agreements: totals.agreements,
            num_referenced_agreements: totals.referenced_agreements,
            num_excluded: totals.excluded,
            utility: UtilityPair::new(
                mean(totals.utility_sum.a, totals.agreements),
                mean(totals.utility_sum.b, totals.agreements),
            ),
            distance_to_nash: mean(totals.nash_distance_sum, totals.referenced_agreements),
            distance_to_kalai: mean(totals.kalai_distance_sum, totals.referenced_agreements),
        }
    }
}

/// Averaged behaviour of one seat across every analysed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BehaviorSummary {
    pub num_runs: u32,
    pub total_offers: u64,
    pub mean_offers: f64,
    /// Mean class percentages in [`MoveClass::ALL`] order.
    pub percentages: [f64; 6],
    /// Recomputed from the mean percentages, not averaged per run.
    pub behavior_sensitivity: BehaviorSensitivity,
    pub infinite_runs: u32,
    pub preference_sensitivity: f64,
}

impl BehaviorSummary {
    pub fn percentage(&self, class: MoveClass) -> f64 {
        self.percentages[class.index()]
    }
}

impl From<&BehaviorTotals> for BehaviorSummary {
    fn from(totals: &BehaviorTotals) -> Self {
        let percentages = totals.percentage_sums.map(|sum| mean(sum, totals.runs));

        let (cooperative, competitive) = MoveClass::ALL.iter().fold(
            (0.0, 0.0),
            |(cooperative, competitive), &class| {
                let value = percentages[class.index()];
                if class.is_cooperative() {
                    (cooperative + value, competitive)
                } else {
                    (cooperative, competitive + value)
                }
            },
        );

        Self {
            num_runs: totals.runs,
            total_offers: totals.offers,
            mean_offers: if totals.runs == 0 {
                0.0
            } else {
                totals.offers as f64 / f64::from(totals.runs)
            },
            percentages,
            behavior_sensitivity: BehaviorSensitivity::from_ratio(cooperative, competitive),
            infinite_runs: totals.infinite_runs,
            preference_sensitivity: mean(totals.preference_sum, totals.runs),
        }
    }
}

/// Summary row for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary<K> {
    pub key: K,
    pub domain: Option<DomainId>,
    /// Agent name per seat, when one was declared or observed.
    pub agents: PerSeat<Option<String>>,
    pub outcome: OutcomeSummary,
    pub behavior: PerSeat<BehaviorSummary>,
}

impl<K> GroupSummary<K> {
    pub fn from_totals(key: K, totals: &GroupTotals) -> Self {
        Self {
            key,
            domain: totals.labels.domain.clone(),
            agents: totals.labels.agents.clone(),
            outcome: OutcomeSummary::from(&totals.outcome),
            behavior: PerSeat::from_fn(|seat| BehaviorSummary::from(&totals.behavior[seat])),
        }
    }
}
