//! CSV row schemas.
//!
//! Each row type borrows the record it renders and declares its own header,
//! so column order lives next to the fields that fill it.

use aggregate::{BehaviorSummary, GroupSummary, OutcomeSummary};
use types::{
    DomainId, DomainReference, MoveClass, MoveRecord, Ordinal, Seat, SeatMetrics, SessionMetrics,
};

/// A record that renders as one CSV line.
pub trait CsvRow {
    fn header() -> Vec<&'static str>;
    fn fields(&self) -> Vec<String>;
}

/// Class percentage columns, in [`MoveClass::ALL`] order.
pub const CLASS_COLUMNS: [&str; 6] = [
    "fortunate_%",
    "selfish_%",
    "concession_%",
    "unfortunate_%",
    "nice_%",
    "silent_%",
];

fn agreement_flag(reached: bool) -> String {
    let flag = if reached { "True" } else { "False" };
    flag.to_string()
}

fn label(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

// =============================================================================
// Per-session rows
// =============================================================================

/// `evaluation.csv`: one row per session.
pub struct EvaluationRow<'a>(pub &'a SessionMetrics);

impl CsvRow for EvaluationRow<'_> {
    fn header() -> Vec<&'static str> {
        vec![
            "domain",
            "agent_A",
            "agent_B",
            "agreement",
            "agreed_by",
            "utility_a",
            "utility_b",
            "distance_nash",
            "distance_kalai",
        ]
    }

    fn fields(&self) -> Vec<String> {
        let m = self.0;
        vec![
            m.domain.to_string(),
            m.seats.a.name.clone(),
            m.seats.b.name.clone(),
            agreement_flag(m.agreement_reached),
            m.agreed_by().to_string(),
            m.agreement_utility.a.to_string(),
            m.agreement_utility.b.to_string(),
            m.distance_to_nash.to_string(),
            m.distance_to_kalai.to_string(),
        ]
    }
}

/// `dans.csv`: one row per seat.
pub struct DansRow<'a> {
    pub domain: &'a DomainId,
    pub seat: &'a SeatMetrics,
}

impl<'a> DansRow<'a> {
    /// Both seat rows of a session, seat A first.
    pub fn for_session(metrics: &'a SessionMetrics) -> [DansRow<'a>; 2] {
        Seat::ALL.map(|seat| DansRow {
            domain: &metrics.domain,
            seat: &metrics.seats[seat],
        })
    }
}

impl CsvRow for DansRow<'_> {
    fn header() -> Vec<&'static str> {
        let mut header = vec!["domain", "agent", "num_offers"];
        header.extend(CLASS_COLUMNS);
        header.extend(["behav_sens", "pref_sens"]);
        header
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.domain.to_string(),
            self.seat.name.clone(),
            self.seat.num_offers.to_string(),
        ];
        fields.extend(
            MoveClass::ALL
                .iter()
                .map(|&class| self.seat.percentage(class).to_string()),
        );
        fields.push(self.seat.behavior_sensitivity.to_string());
        fields.push(self.seat.preference_sensitivity.to_string());
        fields
    }
}

/// `moves_<seat>_<agent>.csv`: one row per classified offer.
pub struct MoveRow<'a>(pub &'a MoveRecord);

impl CsvRow for MoveRow<'_> {
    fn header() -> Vec<&'static str> {
        vec!["delta_a", "delta_b", "move_class", "distance"]
    }

    fn fields(&self) -> Vec<String> {
        let record = self.0;
        vec![
            record.delta_a.to_string(),
            record.delta_b.to_string(),
            record.class.to_string(),
            record
                .frontier_distance
                .map(|distance| distance.to_string())
                .unwrap_or_default(),
        ]
    }
}

/// Any row prefixed with the session ordinal, for tournament-level tables.
pub struct Tagged<R> {
    pub session_id: Ordinal,
    pub row: R,
}

impl<R: CsvRow> CsvRow for Tagged<R> {
    fn header() -> Vec<&'static str> {
        let mut header = vec!["session_id"];
        header.extend(R::header());
        header
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.session_id.to_string()];
        fields.extend(self.row.fields());
        fields
    }
}

// =============================================================================
// Aggregate rows
// =============================================================================

fn outcome_fields(outcome: &OutcomeSummary) -> [String; 4] {
    [
        outcome.utility.a.to_string(),
        outcome.utility.b.to_string(),
        outcome.distance_to_nash.to_string(),
        outcome.distance_to_kalai.to_string(),
    ]
}

fn behavior_fields(behavior: &BehaviorSummary) -> Vec<String> {
    let mut fields = vec![
        behavior.total_offers.to_string(),
        behavior.mean_offers.to_string(),
    ];
    fields.extend(
        MoveClass::ALL
            .iter()
            .map(|&class| behavior.percentage(class).to_string()),
    );
    fields.push(behavior.behavior_sensitivity.to_string());
    fields.push(behavior.infinite_runs.to_string());
    fields.push(behavior.preference_sensitivity.to_string());
    fields
}

fn behavior_header() -> Vec<&'static str> {
    // num_offers is the sum over runs, matching the per-session column.
    let mut header = vec!["num_offers", "mean_offers"];
    header.extend(CLASS_COLUMNS);
    header.extend(["behav_sens", "infinite_behav_runs", "pref_sens"]);
    header
}

/// `aggregate_evaluation.csv`: one row per matchup ordinal.
pub struct OrdinalEvaluationRow<'a>(pub &'a GroupSummary<Ordinal>);

impl CsvRow for OrdinalEvaluationRow<'_> {
    fn header() -> Vec<&'static str> {
        vec![
            "session_id",
            "domain",
            "agent_A",
            "agent_B",
            "num_agreements",
            "num_tournaments",
            "num_excluded",
            "utility_a",
            "utility_b",
            "distance_nash",
            "distance_kalai",
        ]
    }

    fn fields(&self) -> Vec<String> {
        let summary = self.0;
        let mut fields = vec![
            summary.key.to_string(),
            label(summary.domain.as_ref().map(DomainId::as_str)),
            label(summary.agents.a.as_deref()),
            label(summary.agents.b.as_deref()),
            summary.outcome.num_agreements.to_string(),
            summary.outcome.num_runs.to_string(),
            summary.outcome.num_excluded.to_string(),
        ];
        fields.extend(outcome_fields(&summary.outcome));
        fields
    }
}

/// `dans_evaluation.csv`: one row per matchup ordinal and role.
pub struct OrdinalDansRow<'a> {
    pub summary: &'a GroupSummary<Ordinal>,
    pub seat: Seat,
}

impl<'a> OrdinalDansRow<'a> {
    pub fn for_group(summary: &'a GroupSummary<Ordinal>) -> [OrdinalDansRow<'a>; 2] {
        Seat::ALL.map(|seat| OrdinalDansRow { summary, seat })
    }
}

impl CsvRow for OrdinalDansRow<'_> {
    fn header() -> Vec<&'static str> {
        let mut header = vec!["session_id", "domain", "role", "agent", "num_tournaments"];
        header.extend(behavior_header());
        header
    }

    fn fields(&self) -> Vec<String> {
        let behavior = &self.summary.behavior[self.seat];
        let mut fields = vec![
            self.summary.key.to_string(),
            label(self.summary.domain.as_ref().map(DomainId::as_str)),
            self.seat.role_label().to_string(),
            label(self.summary.agents[self.seat].as_deref()),
            behavior.num_runs.to_string(),
        ];
        fields.extend(behavior_fields(behavior));
        fields
    }
}

/// `domain_evaluation.csv`: one row per domain.
pub struct DomainEvaluationRow<'a>(pub &'a GroupSummary<DomainId>);

impl CsvRow for DomainEvaluationRow<'_> {
    fn header() -> Vec<&'static str> {
        vec![
            "domain",
            "num_agreements",
            "num_runs",
            "num_excluded",
            "utility_a",
            "utility_b",
            "distance_nash",
            "distance_kalai",
        ]
    }

    fn fields(&self) -> Vec<String> {
        let summary = self.0;
        let mut fields = vec![
            summary.key.to_string(),
            summary.outcome.num_agreements.to_string(),
            summary.outcome.num_runs.to_string(),
            summary.outcome.num_excluded.to_string(),
        ];
        fields.extend(outcome_fields(&summary.outcome));
        fields
    }
}

/// `domain_dans.csv`: one row per domain and role.
pub struct DomainDansRow<'a> {
    pub summary: &'a GroupSummary<DomainId>,
    pub seat: Seat,
}

impl<'a> DomainDansRow<'a> {
    pub fn for_group(summary: &'a GroupSummary<DomainId>) -> [DomainDansRow<'a>; 2] {
        Seat::ALL.map(|seat| DomainDansRow { summary, seat })
    }
}

impl CsvRow for DomainDansRow<'_> {
    fn header() -> Vec<&'static str> {
        let mut header = vec!["domain", "role", "num_runs"];
        header.extend(behavior_header());
        header
    }

    fn fields(&self) -> Vec<String> {
        let behavior = &self.summary.behavior[self.seat];
        let mut fields = vec![
            self.summary.key.to_string(),
            self.seat.role_label().to_string(),
            behavior.num_runs.to_string(),
        ];
        fields.extend(behavior_fields(behavior));
        fields
    }
}

// =============================================================================
// Domain catalogue
// =============================================================================

/// `domains_summary.csv`: one row per readable domain.
pub struct DomainSummaryRow<'a> {
    pub domain_id: usize,
    pub domain: &'a DomainId,
    pub reference: &'a DomainReference,
}

impl CsvRow for DomainSummaryRow<'_> {
    fn header() -> Vec<&'static str> {
        vec![
            "domain_id",
            "domain",
            "size",
            "pareto_points",
            "nash_a",
            "nash_b",
            "kalai_a",
            "kalai_b",
        ]
    }

    fn fields(&self) -> Vec<String> {
        let nash = self.reference.nash_point();
        let kalai = self.reference.kalai_point();
        vec![
            self.domain_id.to_string(),
            self.domain.to_string(),
            self.reference.size.to_string(),
            self.reference.pareto_front.len().to_string(),
            nash.a.to_string(),
            nash.b.to_string(),
            kalai.a.to_string(),
            kalai.b.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{BehaviorSensitivity, UtilityPair};

    fn assert_shape<R: CsvRow>(row: &R) {
        assert_eq!(R::header().len(), row.fields().len());
    }

    #[test]
    fn test_move_row_distance_rendering() {
        let mut record = MoveRecord {
            seat: Seat::A,
            previous: UtilityPair::ZERO,
            current: UtilityPair::new(0.5, 0.5),
            delta_a: 0.5,
            delta_b: 0.5,
            class: MoveClass::Fortunate,
            frontier_distance: None,
        };
        assert_eq!(MoveRow(&record).fields(), vec!["0.5", "0.5", "fortunate", ""]);

        record.frontier_distance = Some(f64::INFINITY);
        assert_eq!(MoveRow(&record).fields()[3], "inf");
        assert_shape(&MoveRow(&record));
    }

    #[test]
    fn test_tagged_prefixes_session_id() {
        let record = MoveRecord {
            seat: Seat::B,
            previous: UtilityPair::ZERO,
            current: UtilityPair::ZERO,
            delta_a: 0.0,
            delta_b: 0.0,
            class: MoveClass::Silent,
            frontier_distance: Some(0.25),
        };
        let tagged = Tagged {
            session_id: Ordinal(7),
            row: MoveRow(&record),
        };
        assert_eq!(Tagged::<MoveRow>::header()[0], "session_id");
        assert_eq!(tagged.fields()[0], "7");
        assert_shape(&tagged);
    }

    #[test]
    fn test_behavior_columns_line_up() {
        let summary = BehaviorSummary {
            num_runs: 2,
            total_offers: 9,
            mean_offers: 4.5,
            percentages: [10.0, 20.0, 30.0, 40.0, 0.0, 0.0],
            behavior_sensitivity: BehaviorSensitivity::Infinite,
            infinite_runs: 1,
            preference_sensitivity: 0.05,
        };
        let header = behavior_header();
        let fields = behavior_fields(&summary);
        assert_eq!(header.len(), fields.len());

        let column = |name: &str| {
            let index = header.iter().position(|h| *h == name).unwrap();
            fields[index].clone()
        };
        assert_eq!(column("concession_%"), "30");
        assert_eq!(column("behav_sens"), "inf");
        assert_eq!(column("num_offers"), "9");
        assert_eq!(column("mean_offers"), "4.5");
    }
}
