//! Aggregation engine for negotiation session metrics.
//!
//! Rolls per-session [`SessionMetrics`](types::SessionMetrics) up across
//! repeated tournament executions at two independent granularities: per
//! matchup ordinal and per domain.
//!
//! # Modules
//!
//! - [`accumulator`] - Plain sums and counts per group
//! - [`summary`] - Divide-by-zero-safe averages over the accumulators
//! - [`engine`] - Grouping, exclusion counting and merging
//! - [`roles`] - Declared matchups and stable `Agent_A`/`Agent_B` roles
//!
//! # Averaging rules
//!
//! - Outcome fields (agreement utility, distance to Nash/Kalai) average over
//!   agreeing runs only; distances additionally require the domain reference
//! - Behavioural fields (class percentages, preference sensitivity, offers)
//!   average over every analysed run
//! - Aggregated behaviour sensitivity is recomputed from the averaged
//!   percentages; per-run infinities are only counted, never summed

pub mod accumulator;
pub mod engine;
pub mod roles;
pub mod summary;

pub use accumulator::{BehaviorTotals, GroupLabels, GroupTotals, OutcomeTotals};
pub use engine::{
    Aggregate, CampaignAggregate, SessionRecord, aggregate_by_domain, aggregate_by_ordinal,
};
pub use roles::{Matchup, MatchupTable};
pub use summary::{BehaviorSummary, GroupSummary, OutcomeSummary};
