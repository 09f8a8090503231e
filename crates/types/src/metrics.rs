//! Metric records derived from a negotiation trace.
//!
//! [`SessionMetrics`] is produced once per trace in a single pass and never
//! mutated afterwards. [`MoveRecord`]s are the per-offer intermediate values;
//! they are kept beside the metrics only so callers can write move logs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

use crate::ids::{ActorId, DomainId};
use crate::seat::{PerSeat, Seat};
use crate::utility::UtilityPair;

// =============================================================================
// Move Classes
// =============================================================================

/// The six-way concession taxonomy for a bidder's successive offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveClass {
    Fortunate,
    Selfish,
    Concession,
    Unfortunate,
    Nice,
    Silent,
}

impl MoveClass {
    /// All classes in canonical (column) order.
    pub const ALL: [MoveClass; 6] = [
        MoveClass::Fortunate,
        MoveClass::Selfish,
        MoveClass::Concession,
        MoveClass::Unfortunate,
        MoveClass::Nice,
        MoveClass::Silent,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoveClass::Fortunate => "fortunate",
            MoveClass::Selfish => "selfish",
            MoveClass::Concession => "concession",
            MoveClass::Unfortunate => "unfortunate",
            MoveClass::Nice => "nice",
            MoveClass::Silent => "silent",
        }
    }

    /// Whether the class counts toward the numerator of behaviour sensitivity.
    pub fn is_cooperative(self) -> bool {
        matches!(
            self,
            MoveClass::Fortunate | MoveClass::Nice | MoveClass::Concession
        )
    }
}

impl fmt::Display for MoveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tally of moves per class for one seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts([u32; 6]);

impl ClassCounts {
    pub fn record(&mut self, class: MoveClass) {
        self.0[class.index()] += 1;
    }

    pub fn get(&self, class: MoveClass) -> u32 {
        self.0[class.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Fortunate + nice + concession.
    pub fn cooperative(&self) -> u32 {
        MoveClass::ALL
            .iter()
            .filter(|class| class.is_cooperative())
            .map(|&class| self.get(class))
            .sum()
    }

    /// Unfortunate + silent + selfish.
    pub fn competitive(&self) -> u32 {
        self.total() - self.cooperative()
    }

    /// `100 * count / offers`, or 0 when there were no offers.
    pub fn percentage(&self, class: MoveClass, offers: u32) -> f64 {
        if offers == 0 {
            return 0.0;
        }
        f64::from(self.get(class)) / f64::from(offers) * 100.0
    }
}

impl Index<MoveClass> for ClassCounts {
    type Output = u32;

    fn index(&self, class: MoveClass) -> &u32 {
        &self.0[class.index()]
    }
}

// =============================================================================
// Behaviour Sensitivity
// =============================================================================

/// Ratio of cooperative-leaning to competitive-leaning moves.
///
/// Infinity is a tagged variant rather than an IEEE value so it can never leak
/// into a sum or an average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BehaviorSensitivity {
    Finite(f64),
    Infinite,
}

impl BehaviorSensitivity {
    /// `cooperative / competitive`; `0/0` is `Finite(0)` and `x/0` is `Infinite`.
    pub fn from_ratio(cooperative: f64, competitive: f64) -> Self {
        if competitive == 0.0 {
            if cooperative == 0.0 {
                BehaviorSensitivity::Finite(0.0)
            } else {
                BehaviorSensitivity::Infinite
            }
        } else {
            BehaviorSensitivity::Finite(cooperative / competitive)
        }
    }

    pub fn finite(self) -> Option<f64> {
        match self {
            BehaviorSensitivity::Finite(value) => Some(value),
            BehaviorSensitivity::Infinite => None,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, BehaviorSensitivity::Infinite)
    }
}

impl Default for BehaviorSensitivity {
    fn default() -> Self {
        BehaviorSensitivity::Finite(0.0)
    }
}

impl fmt::Display for BehaviorSensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorSensitivity::Finite(value) => write!(f, "{}", value),
            BehaviorSensitivity::Infinite => f.write_str("inf"),
        }
    }
}

// =============================================================================
// Per-move and Per-session Records
// =============================================================================

/// One classified offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub seat: Seat,
    /// The same seat's previous offer, `(0, 0)` before its first one.
    pub previous: UtilityPair,
    pub current: UtilityPair,
    pub delta_a: f64,
    pub delta_b: f64,
    pub class: MoveClass,
    /// Distance to the nearest dominating frontier point; `+inf` when none
    /// dominates, `None` when the domain reference was unavailable.
    pub frontier_distance: Option<f64>,
}

/// Behavioural metrics for one seat of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatMetrics {
    pub actor: ActorId,
    /// Short display name derived from the actor id.
    pub name: String,
    /// Profile path the party declared in the trace.
    pub profile: String,
    pub num_offers: u32,
    pub class_counts: ClassCounts,
    pub behavior_sensitivity: BehaviorSensitivity,
    pub preference_sensitivity: f64,
    /// Offers with no dominating frontier point (or no frontier at all).
    pub frontier_misses: u32,
}

impl SeatMetrics {
    pub fn percentage(&self, class: MoveClass) -> f64 {
        self.class_counts.percentage(class, self.num_offers)
    }
}

/// Evaluation and behavioural metrics for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub domain: DomainId,
    pub seats: PerSeat<SeatMetrics>,
    pub agreement_reached: bool,
    pub agreement_actor: Option<Seat>,
    /// Zero vector when no agreement was reached.
    pub agreement_utility: UtilityPair,
    /// 0 when no agreement was reached or the reference was unavailable.
    pub distance_to_nash: f64,
    /// 0 when no agreement was reached or the reference was unavailable.
    pub distance_to_kalai: f64,
    pub reference_available: bool,
    pub skipped_actions: u32,
    pub protocol_error: Option<String>,
}

impl SessionMetrics {
    pub fn agreement_actor_id(&self) -> Option<&ActorId> {
        self.agreement_actor.map(|seat| &self.seats[seat].actor)
    }

    /// The same session seen with seat A and seat B exchanged.
    ///
    /// Distances to the reference points are unchanged: the reference is
    /// mirrored along with the agreement.
    pub fn swapped(self) -> Self {
        Self {
            seats: self.seats.swapped(),
            agreement_actor: self.agreement_actor.map(Seat::opponent),
            agreement_utility: self.agreement_utility.swapped(),
            ..self
        }
    }

    /// Display name of the accepting seat, empty when there was no agreement.
    pub fn agreed_by(&self) -> &str {
        self.agreement_actor
            .map(|seat| self.seats[seat].name.as_str())
            .unwrap_or("")
    }
}

/// Output of replaying one trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub metrics: SessionMetrics,
    pub moves: Vec<MoveRecord>,
}

impl SessionAnalysis {
    pub fn moves_for(&self, seat: Seat) -> impl Iterator<Item = &MoveRecord> {
        self.moves.iter().filter(move |record| record.seat == seat)
    }
}
