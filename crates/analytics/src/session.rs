//! Single-pass session metrics computation.
//!
//! The trace is replayed once, in order. Each offer updates a fixed two-slot
//! accumulator for the bidding seat; each accept records the agreement. The
//! final [`SessionMetrics`] is assembled from the accumulators afterwards.

use tracing::debug;
use types::{
    Action, BehaviorSensitivity, ClassCounts, DomainReference, MoveRecord, NegotiationTrace,
    PerSeat, Seat, SeatMetrics, SessionAnalysis, SessionMetrics, UtilityPair,
};

use crate::classify::classify_with_tolerance;
use crate::error::Result;
use crate::pareto::distance_to_frontier;
use crate::seats::{SeatMap, resolve_seats};
use crate::tolerance::Tolerances;

/// Running totals for one seat.
#[derive(Debug, Default)]
struct SeatAccumulator {
    previous: UtilityPair,
    num_offers: u32,
    class_counts: ClassCounts,
    distance_sum: f64,
    frontier_misses: u32,
}

impl SeatAccumulator {
    fn finish(self, seat: Seat, seats: &SeatMap) -> SeatMetrics {
        let actor = seats.actor(seat).clone();
        let preference_sensitivity = if self.num_offers == 0 {
            0.0
        } else {
            self.distance_sum / f64::from(self.num_offers)
        };

        SeatMetrics {
            name: actor.display_name(),
            actor,
            profile: seats.profile(seat).to_string(),
            num_offers: self.num_offers,
            class_counts: self.class_counts,
            behavior_sensitivity: BehaviorSensitivity::from_ratio(
                f64::from(self.class_counts.cooperative()),
                f64::from(self.class_counts.competitive()),
            ),
            preference_sensitivity,
            frontier_misses: self.frontier_misses,
        }
    }
}

/// Resolve seats, then compute metrics for one trace.
///
/// `reference` is `None` when the domain's reference file could not be read;
/// the session is still analysed, with frontier-derived values left at zero.
pub fn analyze_trace(
    trace: &NegotiationTrace,
    reference: Option<&DomainReference>,
    tolerances: Tolerances,
) -> Result<SessionAnalysis> {
    let seats = resolve_seats(trace)?;
    Ok(compute_session_metrics(trace, reference, &seats, tolerances))
}

/// Replay `trace` once and derive its evaluation and behavioural metrics.
pub fn compute_session_metrics(
    trace: &NegotiationTrace,
    reference: Option<&DomainReference>,
    seats: &SeatMap,
    tolerances: Tolerances,
) -> SessionAnalysis {
    let mut acc: PerSeat<SeatAccumulator> = PerSeat::default();
    let mut moves = Vec::new();
    let mut skipped = 0u32;
    let mut agreement: Option<(Seat, UtilityPair)> = None;

    for action in &trace.actions {
        let body = action.body();
        let (Some(seat), Some(current)) = (seats.seat_of(&body.actor), seats.utility_pair(body))
        else {
            debug!(actor = %body.actor, "action without a seated actor or both utilities, skipping");
            skipped += 1;
            continue;
        };

        match action {
            Action::Offer(_) => {
                let slot = &mut acc[seat];
                let previous = slot.previous;
                let delta = current - previous;
                // Seat order for every bidder: (seat A's delta, seat B's delta).
                let class = classify_with_tolerance(delta.a, delta.b, tolerances.zero);

                let frontier_distance = reference.map(|reference| {
                    distance_to_frontier(current, seat, reference.frontier(), tolerances.frontier)
                });
                match frontier_distance {
                    Some(distance) if distance.is_finite() => slot.distance_sum += distance,
                    _ => slot.frontier_misses += 1,
                }

                slot.num_offers += 1;
                slot.class_counts.record(class);
                slot.previous = current;

                tracing::trace!(%seat, %class, delta_a = delta.a, delta_b = delta.b, "offer classified");
                moves.push(MoveRecord {
                    seat,
                    previous,
                    current,
                    delta_a: delta.a,
                    delta_b: delta.b,
                    class,
                    frontier_distance,
                });
            }
            Action::Accept(_) => {
                agreement = Some((seat, current));
            }
        }
    }

    let seat_metrics = acc.map(|seat, slot| slot.finish(seat, seats));

    let agreement_utility = agreement.map(|(_, utility)| utility).unwrap_or(UtilityPair::ZERO);
    let (distance_to_nash, distance_to_kalai) = match (agreement, reference) {
        (Some((_, utility)), Some(reference)) => (
            utility.distance(reference.nash_point()),
            utility.distance(reference.kalai_point()),
        ),
        _ => (0.0, 0.0),
    };

    let metrics = SessionMetrics {
        domain: seats.domain().clone(),
        seats: seat_metrics,
        agreement_reached: agreement.is_some(),
        agreement_actor: agreement.map(|(seat, _)| seat),
        agreement_utility,
        distance_to_nash,
        distance_to_kalai,
        reference_available: reference.is_some(),
        skipped_actions: trace.skipped_actions + skipped,
        protocol_error: trace.protocol_error.clone(),
    };

    SessionAnalysis { metrics, moves }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{ActorId, MoveClass, PartyProfile, ReferencePoint};

    const A: &str = "party_alpha_17_A";
    const B: &str = "party_beta_42_B";

    fn utils(a: f64, b: f64) -> [(ActorId, f64); 2] {
        [(ActorId::from(A), a), (ActorId::from(B), b)]
    }

    fn trace_of(actions: Vec<Action>) -> NegotiationTrace {
        NegotiationTrace::new(
            vec![
                (
                    ActorId::from(A),
                    PartyProfile::new("file:domains/domain03/profileA.json"),
                ),
                (
                    ActorId::from(B),
                    PartyProfile::new("file:domains/domain03/profileB.json"),
                ),
            ],
            actions,
        )
    }

    fn scenario_one() -> NegotiationTrace {
        trace_of(vec![
            Action::offer(A, utils(0.5, 0.5)),
            Action::offer(A, utils(0.6, 0.4)),
            Action::offer(A, utils(0.6, 0.4)),
            Action::accept(B, utils(0.6, 0.4)),
        ])
    }

    fn reference() -> DomainReference {
        DomainReference {
            size: 16,
            pareto_front: vec![
                ReferencePoint::at(UtilityPair::new(1.0, 0.2)),
                ReferencePoint::at(UtilityPair::new(0.7, 0.5)),
                ReferencePoint::at(UtilityPair::new(0.5, 0.7)),
                ReferencePoint::at(UtilityPair::new(0.2, 1.0)),
            ],
            nash: ReferencePoint::at(UtilityPair::new(0.7, 0.5)),
            kalai: ReferencePoint::at(UtilityPair::new(0.5, 0.7)),
        }
    }

    #[test]
    fn test_scenario_move_sequence() {
        let analysis = analyze_trace(&scenario_one(), None, Tolerances::default()).unwrap();

        let classes: Vec<_> = analysis.moves.iter().map(|m| m.class).collect();
        assert_eq!(
            classes,
            vec![MoveClass::Fortunate, MoveClass::Selfish, MoveClass::Silent]
        );

        let metrics = &analysis.metrics;
        assert!(metrics.agreement_reached);
        assert_eq!(metrics.agreement_actor, Some(Seat::B));
        assert_eq!(metrics.agreed_by(), "42_B");
        assert_eq!(metrics.agreement_utility, UtilityPair::new(0.6, 0.4));
        assert_eq!(metrics.seats.a.num_offers, 3);
        assert_eq!(metrics.seats.b.num_offers, 0);
        assert_eq!(metrics.domain.as_str(), "domain03");
    }

    #[test]
    fn test_sensitivities_without_reference() {
        let analysis = analyze_trace(&scenario_one(), None, Tolerances::default()).unwrap();
        let seat_a = &analysis.metrics.seats.a;

        // fortunate vs selfish + silent
        assert_eq!(seat_a.behavior_sensitivity, BehaviorSensitivity::Finite(0.5));
        assert_eq!(seat_a.preference_sensitivity, 0.0);
        assert_eq!(seat_a.frontier_misses, 3);
        assert!(!analysis.metrics.reference_available);
        assert_eq!(analysis.metrics.distance_to_nash, 0.0);
        assert!(analysis.moves.iter().all(|m| m.frontier_distance.is_none()));
    }

    #[test]
    fn test_reference_distances() {
        let reference = reference();
        let analysis =
            analyze_trace(&scenario_one(), Some(&reference), Tolerances::default()).unwrap();
        let metrics = &analysis.metrics;

        assert!(metrics.reference_available);
        assert!((metrics.distance_to_nash - 0.02_f64.sqrt()).abs() < 1e-12);
        assert!((metrics.distance_to_kalai - 0.1_f64.sqrt()).abs() < 1e-12);

        // (0.5,0.5) -> (0.7,0.5) or (0.5,0.7) at 0.2; (0.6,0.4) -> (0.7,0.5) twice.
        let expected = (0.2 + 2.0 * 0.02_f64.sqrt()) / 3.0;
        assert!((metrics.seats.a.preference_sensitivity - expected).abs() < 1e-12);
        assert_eq!(metrics.seats.a.frontier_misses, 0);
    }

    #[test]
    fn test_empty_trace_is_all_zero() {
        let analysis = analyze_trace(&trace_of(Vec::new()), None, Tolerances::default()).unwrap();
        let metrics = &analysis.metrics;

        assert!(!metrics.agreement_reached);
        assert_eq!(metrics.agreement_utility, UtilityPair::ZERO);
        for (_, seat) in metrics.seats.iter() {
            assert_eq!(seat.num_offers, 0);
            assert_eq!(seat.behavior_sensitivity, BehaviorSensitivity::Finite(0.0));
            assert_eq!(seat.preference_sensitivity, 0.0);
            for class in MoveClass::ALL {
                assert_eq!(seat.percentage(class), 0.0);
            }
        }
    }

    #[test]
    fn test_immediate_accept() {
        let reference = reference();
        let trace = trace_of(vec![Action::accept(B, utils(0.7, 0.5))]);
        let analysis = analyze_trace(&trace, Some(&reference), Tolerances::default()).unwrap();

        assert!(analysis.moves.is_empty());
        assert!(analysis.metrics.agreement_reached);
        assert_eq!(analysis.metrics.distance_to_nash, 0.0);
        assert_eq!(analysis.metrics.seats.b.preference_sensitivity, 0.0);
    }

    #[test]
    fn test_seat_b_is_classified_in_seat_order() {
        // Deltas are read as (seat A, seat B) whoever bids: B giving up
        // utility to A is selfish, B gaining at A's expense is a concession.
        let trace = trace_of(vec![
            Action::offer(B, utils(0.5, 0.5)),
            Action::offer(B, utils(0.4, 0.6)),
            Action::offer(B, utils(0.5, 0.5)),
        ]);
        let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();
        let classes: Vec<_> = analysis.moves_for(Seat::B).map(|m| m.class).collect();
        assert_eq!(
            classes,
            vec![MoveClass::Fortunate, MoveClass::Concession, MoveClass::Selfish]
        );
        assert_eq!(analysis.metrics.seats.b.behavior_sensitivity, BehaviorSensitivity::Finite(2.0));
    }

    #[test]
    fn test_both_seats_classify_the_same_delta_alike() {
        let trace = trace_of(vec![
            Action::offer(A, utils(0.5, 0.5)),
            Action::offer(B, utils(0.5, 0.5)),
            Action::offer(A, utils(0.6, 0.4)),
            Action::offer(B, utils(0.6, 0.4)),
        ]);
        let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();
        let a: Vec<_> = analysis.moves_for(Seat::A).map(|m| m.class).collect();
        let b: Vec<_> = analysis.moves_for(Seat::B).map(|m| m.class).collect();
        assert_eq!(a, b);
        assert_eq!(b[1], MoveClass::Selfish);
        assert_eq!(analysis.metrics.seats.b.profile, "file:domains/domain03/profileB.json");
    }

    #[test]
    fn test_baseline_is_per_seat() {
        let trace = trace_of(vec![
            Action::offer(A, utils(0.9, 0.1)),
            Action::offer(B, utils(0.2, 0.8)),
            Action::offer(A, utils(0.8, 0.2)),
        ]);
        let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();

        let a_moves: Vec<_> = analysis.moves_for(Seat::A).collect();
        assert_eq!(a_moves[1].previous, UtilityPair::new(0.9, 0.1));
        assert_eq!(a_moves[1].class, MoveClass::Concession);
        let b_first = analysis.moves_for(Seat::B).next().unwrap();
        assert_eq!(b_first.previous, UtilityPair::ZERO);
    }

    #[test]
    fn test_counts_sum_and_percentage_bounds() {
        let trace = trace_of(vec![
            Action::offer(A, utils(0.9, 0.1)),
            Action::offer(B, utils(0.3, 0.9)),
            Action::offer(A, utils(0.8, 0.3)),
            Action::offer(B, utils(0.3, 0.9)),
            Action::offer(A, utils(0.7, 0.2)),
            Action::offer(B, utils(0.5, 0.8)),
        ]);
        let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();

        for (_, seat) in analysis.metrics.seats.iter() {
            assert_eq!(seat.class_counts.total(), seat.num_offers);
            let total: f64 = MoveClass::ALL.iter().map(|&c| seat.percentage(c)).sum();
            assert!((total - 100.0).abs() < 1e-9);
            for class in MoveClass::ALL {
                assert!((0.0..=100.0).contains(&seat.percentage(class)));
            }
        }
    }

    #[test]
    fn test_infinite_behavior_sensitivity() {
        let trace = trace_of(vec![
            Action::offer(A, utils(0.5, 0.5)),
            Action::offer(A, utils(0.4, 0.6)),
        ]);
        let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();
        assert!(analysis.metrics.seats.a.behavior_sensitivity.is_infinite());
    }

    #[test]
    fn test_unknown_actor_and_missing_utility_are_skipped() {
        let mut trace = trace_of(vec![
            Action::offer("stranger_1_C", utils(0.5, 0.5)),
            Action::offer(A, [(ActorId::from(A), 0.5)]),
            Action::offer(A, utils(0.5, 0.5)),
        ]);
        trace.skipped_actions = 2;
        let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();

        assert_eq!(analysis.metrics.skipped_actions, 4);
        assert_eq!(analysis.metrics.seats.a.num_offers, 1);
    }

    #[test]
    fn test_last_accept_wins() {
        let trace = trace_of(vec![
            Action::accept(A, utils(0.3, 0.3)),
            Action::accept(B, utils(0.6, 0.4)),
        ]);
        let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();
        assert_eq!(analysis.metrics.agreement_actor, Some(Seat::B));
        assert_eq!(analysis.metrics.agreement_utility, UtilityPair::new(0.6, 0.4));
    }

    #[test]
    fn test_idempotent() {
        let reference = reference();
        let trace = scenario_one();
        let first = analyze_trace(&trace, Some(&reference), Tolerances::default()).unwrap();
        let second = analyze_trace(&trace, Some(&reference), Tolerances::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&first.metrics).unwrap(),
            serde_json::to_string(&second.metrics).unwrap()
        );
    }
}
