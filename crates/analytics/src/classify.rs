//! Six-way move classification.
//!
//! A move is the change between two successive offers by the same seat. It is
//! described by the utility deltas of seat A and seat B, in that order for
//! either bidder, and falls into exactly one [`MoveClass`]:
//!
//! | seat A delta | seat B delta | class |
//! |---|---|---|
//! | > 0 | > 0 | fortunate |
//! | > 0 | ≤ 0 | selfish |
//! | < 0 | ≥ 0 | concession |
//! | ≤ 0 | < 0 | unfortunate |
//! | ≈ 0 | > 0 | nice |
//! | ≈ 0 | ≈ 0 | silent |
//!
//! Deltas inside the zero band are snapped to exactly zero first, then the
//! rules run in table order and the first match wins. Together that makes the
//! table exclusive and exhaustive over finite inputs.

use tracing::debug;
use types::MoveClass;

use crate::Tolerances;

type Rule = (MoveClass, fn(f64, f64) -> bool);

fn fortunate(a: f64, b: f64) -> bool {
    a > 0.0 && b > 0.0
}

fn selfish(a: f64, b: f64) -> bool {
    a > 0.0 && b <= 0.0
}

fn concession(a: f64, b: f64) -> bool {
    a < 0.0 && b >= 0.0
}

fn unfortunate(a: f64, b: f64) -> bool {
    a <= 0.0 && b < 0.0
}

fn nice(a: f64, b: f64) -> bool {
    a == 0.0 && b > 0.0
}

fn silent(a: f64, b: f64) -> bool {
    a == 0.0 && b == 0.0
}

/// Ordered rule table. First match wins.
const RULES: [Rule; 6] = [
    (MoveClass::Fortunate, fortunate),
    (MoveClass::Selfish, selfish),
    (MoveClass::Concession, concession),
    (MoveClass::Unfortunate, unfortunate),
    (MoveClass::Nice, nice),
    (MoveClass::Silent, silent),
];

/// Classify a move using the default zero tolerance.
pub fn classify(delta_a: f64, delta_b: f64) -> MoveClass {
    classify_with_tolerance(delta_a, delta_b, Tolerances::default().zero)
}

/// Classify a move, treating `|delta| <= zero_tolerance` as no change.
///
/// Non-finite deltas cannot come from utilities in `[0, 1]`; if one shows up
/// anyway it is classified as silent.
pub fn classify_with_tolerance(
    delta_a: f64,
    delta_b: f64,
    zero_tolerance: f64,
) -> MoveClass {
    let a = snap(delta_a, zero_tolerance);
    let b = snap(delta_b, zero_tolerance);

    RULES
        .iter()
        .find(|(_, applies)| applies(a, b))
        .map(|&(class, _)| class)
        .unwrap_or_else(|| {
            debug!(delta_a, delta_b, "non-finite utility delta classified as silent");
            MoveClass::Silent
        })
}

fn snap(delta: f64, zero_tolerance: f64) -> f64 {
    if delta.abs() <= zero_tolerance { 0.0 } else { delta }
}
