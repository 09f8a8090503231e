//! Core types for negotiation trace analytics.
//!
//! This crate provides the data model shared by every stage of the pipeline:
//! raw trace input, precomputed domain references, and the metric records
//! derived from them. It performs no I/O.
//!
//! # Modules
//!
//! - [`ids`] - Actor, domain and ordinal identifiers
//! - [`seat`] - Logical seats (A/B) and the fixed-shape [`PerSeat`] container
//! - [`utility`] - Seat-ordered utility pairs and Euclidean distance
//! - [`trace`] - Negotiation trace input (offers, accepts, party profiles)
//! - [`reference`] - Precomputed domain reference points
//! - [`metrics`] - Move classes, sensitivities and per-session metric records

pub mod ids;
pub mod metrics;
pub mod reference;
pub mod seat;
pub mod trace;
pub mod utility;

pub use ids::{ActorId, DomainId, Ordinal};
pub use metrics::{
    BehaviorSensitivity, ClassCounts, MoveClass, MoveRecord, SeatMetrics, SessionAnalysis,
    SessionMetrics,
};
pub use reference::{DomainReference, ReferencePoint};
pub use seat::{PerSeat, Seat};
pub use trace::{Action, ActionBody, Bid, NegotiationTrace, PartyProfile};
pub use utility::UtilityPair;
