//! Declared matchups and stable role labels.
//!
//! A tournament configuration lists its matchups in order; the position in
//! that list is the ordinal. The configuration, not the runtime actor ids,
//! decides which agent sits in which role.
//!
//! A session trace may list its parties in a different order from the
//! configuration. When the matchup declares profile paths, [`Matchup::orient`]
//! swaps such a session back into declared order before it is aggregated.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;
use types::{DomainId, Ordinal, PerSeat, Seat, SessionMetrics};

/// One declared matchup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub agents: PerSeat<String>,
    /// Profile paths per role, when the configuration lists both.
    pub profiles: Option<PerSeat<String>>,
    pub domain: Option<DomainId>,
}

impl Matchup {
    pub fn new(agent_a: impl Into<String>, agent_b: impl Into<String>) -> Self {
        Self {
            agents: PerSeat::new(agent_a.into(), agent_b.into()),
            profiles: None,
            domain: None,
        }
    }

    pub fn with_profiles(mut self, profile_a: impl Into<String>, profile_b: impl Into<String>) -> Self {
        self.profiles = Some(PerSeat::new(profile_a.into(), profile_b.into()));
        self
    }

    pub fn with_domain(mut self, domain: DomainId) -> Self {
        self.domain = Some(domain);
        self
    }

    /// `(role label, agent name)` for each seat in canonical order.
    pub fn roles(&self) -> impl Iterator<Item = (&'static str, &str)> {
        Seat::ALL
            .into_iter()
            .map(|seat| (seat.role_label(), self.agents[seat].as_str()))
    }

    /// True when the observed seat profiles match the declared roles crosswise
    /// and not straight. Without declared profiles nothing is reversed.
    pub fn is_reversed(&self, observed: PerSeat<&str>) -> bool {
        let Some(declared) = &self.profiles else {
            return false;
        };
        let straight = same_profile(observed.a, &declared.a) && same_profile(observed.b, &declared.b);
        let crossed = same_profile(observed.a, &declared.b) && same_profile(observed.b, &declared.a);
        crossed && !straight
    }

    /// `metrics` with seat A holding this matchup's first declared role.
    pub fn orient(&self, metrics: SessionMetrics) -> SessionMetrics {
        let observed = PerSeat::new(
            metrics.seats.a.profile.as_str(),
            metrics.seats.b.profile.as_str(),
        );
        if self.is_reversed(observed) {
            debug!(agent_a = %self.agents.a, agent_b = %self.agents.b, "session seats reversed against declared roles");
            metrics.swapped()
        } else {
            metrics
        }
    }
}

/// Two profile locations name the same file: `file:` prefixes are ignored and
/// a relative path matches any path it is a suffix of.
fn same_profile(observed: &str, declared: &str) -> bool {
    let observed = Path::new(observed.strip_prefix("file:").unwrap_or(observed));
    let declared = Path::new(declared.strip_prefix("file:").unwrap_or(declared));
    if observed.as_os_str().is_empty() || declared.as_os_str().is_empty() {
        return false;
    }
    observed.ends_with(declared) || declared.ends_with(observed)
}

/// Matchups keyed by ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchupTable {
    matchups: BTreeMap<Ordinal, Matchup>,
}

impl MatchupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number matchups `1, 2, ...` in declaration order.
    pub fn from_ordered(matchups: impl IntoIterator<Item = Matchup>) -> Self {
        let matchups = (1..)
            .map(Ordinal)
            .zip(matchups)
            .collect::<BTreeMap<_, _>>();
        Self { matchups }
    }

    pub fn insert(&mut self, ordinal: Ordinal, matchup: Matchup) {
        self.matchups.insert(ordinal, matchup);
    }

    pub fn get(&self, ordinal: Ordinal) -> Option<&Matchup> {
        self.matchups.get(&ordinal)
    }

    pub fn len(&self) -> usize {
        self.matchups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ordinal, &Matchup)> {
        self.matchups.iter().map(|(&ordinal, matchup)| (ordinal, matchup))
    }

    /// Put a session of `ordinal` into its declared role order; sessions of
    /// undeclared ordinals are returned unchanged.
    pub fn orient(&self, ordinal: Ordinal, metrics: SessionMetrics) -> SessionMetrics {
        match self.get(ordinal) {
            Some(matchup) => matchup.orient(metrics),
            None => metrics,
        }
    }
}
