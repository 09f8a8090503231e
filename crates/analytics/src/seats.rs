//! Seat resolution.
//!
//! Raw actor ids carry a per-run suffix, so they are mapped to seats exactly
//! once per trace, from the declaration order of the party-profile table
//! (first declared = seat A). Downstream code only ever sees [`Seat`].

use tracing::warn;
use types::{
    ActionBody, ActorId, DomainId, NegotiationTrace, PartyProfile, PerSeat, Seat, UtilityPair,
};

use crate::error::{AnalyticsError, Result};

/// Actor-to-seat assignment for one trace, plus the domain it was played on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    actors: PerSeat<ActorId>,
    profiles: PerSeat<String>,
    domain: DomainId,
}

impl SeatMap {
    pub fn new(actors: PerSeat<ActorId>, profiles: PerSeat<String>, domain: DomainId) -> Self {
        Self {
            actors,
            profiles,
            domain,
        }
    }

    pub fn actor(&self, seat: Seat) -> &ActorId {
        &self.actors[seat]
    }

    /// Profile path the seat's party declared.
    pub fn profile(&self, seat: Seat) -> &str {
        &self.profiles[seat]
    }

    pub fn domain(&self) -> &DomainId {
        &self.domain
    }

    pub fn seat_of(&self, actor: &ActorId) -> Option<Seat> {
        Seat::ALL.into_iter().find(|&seat| &self.actors[seat] == actor)
    }

    /// Seat-ordered utilities of an action; `None` if either seat is missing.
    pub fn utility_pair(&self, body: &ActionBody) -> Option<UtilityPair> {
        let a = body.utilities.get(&self.actors.a)?;
        let b = body.utilities.get(&self.actors.b)?;
        Some(UtilityPair::new(*a, *b))
    }
}

/// Assign seats from the trace's party-profile declaration order.
pub fn resolve_seats(trace: &NegotiationTrace) -> Result<SeatMap> {
    let mut distinct: Vec<&(ActorId, PartyProfile)> = Vec::with_capacity(2);
    for entry in &trace.party_profiles {
        if !distinct.iter().any(|(actor, _)| actor == &entry.0) {
            distinct.push(entry);
        }
    }

    if distinct.len() < 2 {
        return Err(AnalyticsError::IdentityResolution {
            observed: distinct.len(),
        });
    }
    if distinct.len() > 2 {
        warn!(
            declared = distinct.len(),
            "more than two parties declared, ignoring all but the first two"
        );
    }

    let (actor_a, profile_a) = distinct[0];
    let (actor_b, profile_b) = distinct[1];

    let domain = DomainId::from_profile_path(&profile_a.profile).ok_or_else(|| {
        AnalyticsError::UnknownDomain {
            profile: profile_a.profile.clone(),
        }
    })?;

    Ok(SeatMap::new(
        PerSeat::new(actor_a.clone(), actor_b.clone()),
        PerSeat::new(profile_a.profile.clone(), profile_b.profile.clone()),
        domain,
    ))
}
