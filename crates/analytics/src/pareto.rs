//! Dominance-constrained distance to the Pareto frontier.
//!
//! Only frontier points that are at least as good as the bid for *both* seats
//! are candidates: the distance measures how far the bidder stayed from a deal
//! that would have been better for someone and worse for no one.

use types::{Seat, UtilityPair};

/// `x >= y`, allowing `x` to fall short by a relative `tolerance`.
pub fn at_least(x: f64, y: f64, tolerance: f64) -> bool {
    x >= y || (x - y).abs() <= tolerance * x.abs().max(y.abs()).max(1.0)
}

/// Distance from `utility` to the closest frontier point that weakly dominates
/// it, seen from `seat`.
///
/// Returns `f64::INFINITY` when no frontier point dominates the bid. The
/// sentinel must be filtered out by callers before averaging.
pub fn distance_to_frontier(
    utility: UtilityPair,
    seat: Seat,
    front: impl IntoIterator<Item = UtilityPair>,
    tolerance: f64,
) -> f64 {
    let (own, opponent) = utility.oriented(seat);

    front
        .into_iter()
        .map(|point| point.oriented(seat))
        .filter(|&(point_own, point_opponent)| {
            at_least(point_own, own, tolerance) && at_least(point_opponent, opponent, tolerance)
        })
        .map(|(point_own, point_opponent)| (point_own - own).hypot(point_opponent - opponent))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn front() -> Vec<UtilityPair> {
        vec![
            UtilityPair::new(1.0, 0.2),
            UtilityPair::new(0.8, 0.6),
            UtilityPair::new(0.6, 0.8),
            UtilityPair::new(0.2, 1.0),
        ]
    }

    #[test]
    fn test_zero_on_frontier_point() {
        for point in front() {
            for seat in Seat::ALL {
                assert_eq!(distance_to_frontier(point, seat, front(), TOL), 0.0);
            }
        }
    }

    #[test]
    fn test_nearest_dominating_point_is_used() {
        // (0.7, 0.5) is dominated by (0.8, 0.6) only among the nearby points.
        let d = distance_to_frontier(UtilityPair::new(0.7, 0.5), Seat::A, front(), TOL);
        assert!((d - 0.02_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_non_dominating_closer_point_is_ignored() {
        // (0.95, 0.3) is close to (1.0, 0.2) but that point is worse for B.
        let bid = UtilityPair::new(0.95, 0.3);
        let d = distance_to_frontier(bid, Seat::A, front(), TOL);
        assert_eq!(d, f64::INFINITY);
    }

    #[test]
    fn test_orientation_does_not_change_distance() {
        let bid = UtilityPair::new(0.3, 0.4);
        let from_a = distance_to_frontier(bid, Seat::A, front(), TOL);
        let from_b = distance_to_frontier(bid, Seat::B, front(), TOL);
        assert!((from_a - from_b).abs() < 1e-12);
        assert!(from_a > 0.0);
    }

    #[test]
    fn test_within_tolerance_counts_as_dominating() {
        let bid = UtilityPair::new(0.8 + 1e-12, 0.6);
        assert!(distance_to_frontier(bid, Seat::A, front(), TOL) < 1e-9);
    }

    #[test]
    fn test_empty_front_is_infinite() {
        let d = distance_to_frontier(UtilityPair::new(0.1, 0.1), Seat::B, Vec::new(), TOL);
        assert!(d.is_infinite());
    }

    #[test]
    fn test_distance_is_non_negative() {
        for a in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for b in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let d = distance_to_frontier(UtilityPair::new(a, b), Seat::A, front(), TOL);
                assert!(d >= 0.0);
            }
        }
    }
}
