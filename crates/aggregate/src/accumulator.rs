//! Running totals for one aggregation group.
//!
//! Everything here is a plain sum or count, so combining two totals is
//! associative and commutative regardless of the order sessions arrive in.

use derive_more::Add;
use types::{
    BehaviorSensitivity, DomainId, MoveClass, PerSeat, SeatMetrics, SessionMetrics, UtilityPair,
};

/// Outcome totals: how good the reached agreements were.
#[derive(Debug, Clone, Copy, Default, PartialEq, Add)]
pub struct OutcomeTotals {
    /// Analysed sessions.
    pub runs: u32,
    /// Sessions that ended in an agreement.
    pub agreements: u32,
    /// Agreeing sessions whose domain reference was available.
    pub referenced_agreements: u32,
    /// Sessions excluded from analysis.
    pub excluded: u32,
    /// Sum of agreement utilities over agreeing sessions.
    pub utility_sum: UtilityPair,
    /// Sum of distances to Nash over referenced agreeing sessions.
    pub nash_distance_sum: f64,
    /// Sum of distances to Kalai over referenced agreeing sessions.
    pub kalai_distance_sum: f64,
}

impl OutcomeTotals {
    pub fn record(&mut self, metrics: &SessionMetrics) {
        self.runs += 1;
        if !metrics.agreement_reached {
            return;
        }
        self.agreements += 1;
        self.utility_sum = self.utility_sum + metrics.agreement_utility;
        if metrics.reference_available {
            self.referenced_agreements += 1;
            self.nash_distance_sum += metrics.distance_to_nash;
            self.kalai_distance_sum += metrics.distance_to_kalai;
        }
    }
}

/// Behavioural totals for one seat.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BehaviorTotals {
    pub runs: u32,
    pub offers: u64,
    /// Per-run class percentages, summed, in [`MoveClass::ALL`] order.
    pub percentage_sums: [f64; 6],
    pub preference_sum: f64,
    /// Runs whose own behaviour sensitivity was infinite.
    pub infinite_runs: u32,
}

impl BehaviorTotals {
    pub fn record(&mut self, seat: &SeatMetrics) {
        self.runs += 1;
        self.offers += u64::from(seat.num_offers);
        for class in MoveClass::ALL {
            self.percentage_sums[class.index()] += seat.percentage(class);
        }
        self.preference_sum += seat.preference_sensitivity;
        if let BehaviorSensitivity::Infinite = seat.behavior_sensitivity {
            self.infinite_runs += 1;
        }
    }

    pub fn merge(&mut self, other: &BehaviorTotals) {
        self.runs += other.runs;
        self.offers += other.offers;
        for (sum, extra) in self.percentage_sums.iter_mut().zip(other.percentage_sums) {
            *sum += extra;
        }
        self.preference_sum += other.preference_sum;
        self.infinite_runs += other.infinite_runs;
    }
}

/// Descriptive labels carried alongside a group's totals.
///
/// Merging keeps the smallest value seen for each label, so the result does
/// not depend on merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupLabels {
    pub domain: Option<DomainId>,
    pub agents: PerSeat<Option<String>>,
}

impl GroupLabels {
    pub fn observe(&mut self, metrics: &SessionMetrics) {
        keep_smallest(&mut self.domain, Some(metrics.domain.clone()));
        for (seat, seat_metrics) in metrics.seats.iter() {
            keep_smallest(&mut self.agents[seat], Some(seat_metrics.name.clone()));
        }
    }

    pub fn merge(&mut self, other: &GroupLabels) {
        keep_smallest(&mut self.domain, other.domain.clone());
        keep_smallest(&mut self.agents.a, other.agents.a.clone());
        keep_smallest(&mut self.agents.b, other.agents.b.clone());
    }
}

fn keep_smallest<T: Ord>(current: &mut Option<T>, candidate: Option<T>) {
    let Some(candidate) = candidate else {
        return;
    };
    if current.as_ref().is_none_or(|existing| candidate < *existing) {
        *current = Some(candidate);
    }
}

/// All totals for one group key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupTotals {
    pub outcome: OutcomeTotals,
    pub behavior: PerSeat<BehaviorTotals>,
    pub labels: GroupLabels,
}

impl GroupTotals {
    pub fn record(&mut self, metrics: &SessionMetrics) {
        self.outcome.record(metrics);
        for (seat, seat_metrics) in metrics.seats.iter() {
            self.behavior[seat].record(seat_metrics);
        }
        self.labels.observe(metrics);
    }

    pub fn record_exclusion(&mut self, domain: Option<&DomainId>) {
        self.outcome.excluded += 1;
        keep_smallest(&mut self.labels.domain, domain.cloned());
    }

    pub fn merge(&mut self, other: &GroupTotals) {
        self.outcome = self.outcome + other.outcome;
        self.behavior.a.merge(&other.behavior.a);
        self.behavior.b.merge(&other.behavior.b);
        self.labels.merge(&other.labels);
    }
}
