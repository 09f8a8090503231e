//! Trace analytics for recorded bilateral negotiations.
//!
//! Replays one negotiation trace against a precomputed domain reference and
//! produces a [`SessionMetrics`](types::SessionMetrics) record.
//!
//! # Modules
//!
//! - [`classify`] - Six-way move classification
//! - [`pareto`] - Dominance-constrained distance to the Pareto frontier
//! - [`seats`] - One-shot resolution of actor ids to seats
//! - [`session`] - Single-pass session metrics computation
//!
//! # Example
//!
//! ```
//! use analytics::{Tolerances, analyze_trace};
//! use types::{Action, ActorId, NegotiationTrace, PartyProfile};
//!
//! let a = ActorId::from("party_alpha_1_A");
//! let b = ActorId::from("party_beta_2_B");
//! let trace = NegotiationTrace::new(
//!     vec![
//!         (a.clone(), PartyProfile::new("file:domains/domain00/profileA.json")),
//!         (b.clone(), PartyProfile::new("file:domains/domain00/profileB.json")),
//!     ],
//!     vec![
//!         Action::offer(a.clone(), [(a.clone(), 0.5), (b.clone(), 0.5)]),
//!         Action::accept(b.clone(), [(a.clone(), 0.5), (b.clone(), 0.5)]),
//!     ],
//! );
//!
//! let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();
//! assert!(analysis.metrics.agreement_reached);
//! assert_eq!(analysis.metrics.seats.a.num_offers, 1);
//! ```
//!
//! # Design Notes
//!
//! - Everything here is pure and deterministic: the same trace and reference
//!   always yield identical metrics, so sessions can be analysed in parallel
//! - Per-seat state lives in a fixed two-slot accumulator keyed by
//!   [`Seat`](types::Seat), never in maps keyed by raw actor ids

pub mod classify;
mod error;
pub mod pareto;
pub mod seats;
pub mod session;
mod tolerance;

pub use classify::{classify, classify_with_tolerance};
pub use error::{AnalyticsError, Result};
pub use pareto::distance_to_frontier;
pub use seats::{SeatMap, resolve_seats};
pub use session::{analyze_trace, compute_session_metrics};
pub use tolerance::Tolerances;
