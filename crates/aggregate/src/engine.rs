//! Grouped aggregation over session metrics.

use std::collections::BTreeMap;

use tracing::debug;
use types::{DomainId, Ordinal, SessionMetrics};

use crate::accumulator::GroupTotals;
use crate::roles::MatchupTable;
use crate::summary::GroupSummary;

/// One analysed session tagged with its matchup ordinal.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub ordinal: Ordinal,
    pub metrics: SessionMetrics,
}

impl SessionRecord {
    pub fn new(ordinal: Ordinal, metrics: SessionMetrics) -> Self {
        Self { ordinal, metrics }
    }
}

/// Totals grouped by key `K`, iterated in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<K: Ord> {
    groups: BTreeMap<K, GroupTotals>,
}

impl<K: Ord> Default for Aggregate<K> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> Aggregate<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: K, metrics: &SessionMetrics) {
        self.groups.entry(key).or_default().record(metrics);
    }

    /// Count a session that could not be analysed.
    pub fn record_exclusion(&mut self, key: K, domain: Option<&DomainId>) {
        self.groups.entry(key).or_default().record_exclusion(domain);
    }

    /// Fold another partial aggregate into this one.
    pub fn merge(&mut self, other: &Aggregate<K>) {
        for (key, totals) in &other.groups {
            self.groups.entry(key.clone()).or_default().merge(totals);
        }
    }

    pub fn get(&self, key: &K) -> Option<&GroupTotals> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn summaries(&self) -> Vec<GroupSummary<K>> {
        self.groups
            .iter()
            .map(|(key, totals)| GroupSummary::from_totals(key.clone(), totals))
            .collect()
    }
}

impl Aggregate<Ordinal> {
    /// Summaries with agent names and domains taken from the declared
    /// matchups where available.
    pub fn summaries_with(&self, matchups: &MatchupTable) -> Vec<GroupSummary<Ordinal>> {
        let mut summaries = self.summaries();
        for summary in &mut summaries {
            let Some(matchup) = matchups.get(summary.key) else {
                continue;
            };
            summary.agents = matchup.agents.clone().map(|_, name| Some(name));
            if let Some(domain) = &matchup.domain {
                summary.domain = Some(domain.clone());
            }
        }
        summaries
    }
}

/// Group sessions by matchup ordinal.
pub fn aggregate_by_ordinal<'a>(
    sessions: impl IntoIterator<Item = &'a SessionRecord>,
) -> Aggregate<Ordinal> {
    let mut aggregate = Aggregate::new();
    for session in sessions {
        aggregate.record(session.ordinal, &session.metrics);
    }
    debug!(groups = aggregate.len(), "aggregated by ordinal");
    aggregate
}

/// Group sessions by domain, pooling every matchup played on it.
pub fn aggregate_by_domain<'a>(
    sessions: impl IntoIterator<Item = &'a SessionRecord>,
) -> Aggregate<DomainId> {
    let mut aggregate = Aggregate::new();
    for session in sessions {
        aggregate.record(session.metrics.domain.clone(), &session.metrics);
    }
    debug!(groups = aggregate.len(), "aggregated by domain");
    aggregate
}

/// Both granularities of a campaign, built and merged together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignAggregate {
    pub by_ordinal: Aggregate<Ordinal>,
    pub by_domain: Aggregate<DomainId>,
}

impl CampaignAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a SessionRecord>) -> Self {
        let mut aggregate = Self::new();
        for session in sessions {
            aggregate.record(session);
        }
        aggregate
    }

    pub fn record(&mut self, session: &SessionRecord) {
        self.by_ordinal.record(session.ordinal, &session.metrics);
        self.by_domain
            .record(session.metrics.domain.clone(), &session.metrics);
    }

    /// Count an excluded session under its ordinal, and under its domain when
    /// the domain is known.
    pub fn record_exclusion(&mut self, ordinal: Ordinal, domain: Option<&DomainId>) {
        self.by_ordinal.record_exclusion(ordinal, domain);
        if let Some(domain) = domain {
            self.by_domain
                .record_exclusion(domain.clone(), Some(domain));
        }
    }

    pub fn merge(&mut self, other: &CampaignAggregate) {
        self.by_ordinal.merge(&other.by_ordinal);
        self.by_domain.merge(&other.by_domain);
    }
}
