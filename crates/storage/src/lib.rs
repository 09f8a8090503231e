//! Storage layer for negotiation analytics.
//!
//! All file I/O lives here: reading traces, domain references and matchup
//! configuration, discovering tournament and domain directories, and writing
//! CSV artifacts. Nothing in this crate computes metrics.
//!
//! # Modules
//!
//! - [`layout`] - Results and domains directory discovery
//! - [`trace`] - Trace file loading
//! - [`reference`] - Domain reference loading and the per-run cache
//! - [`matchups`] - `tournament_steps.json` parsing
//! - [`rows`] - CSV row schemas
//! - [`writer`] - Whole-table and append-with-header-if-absent writers
//! - [`artifacts`] - Session, tournament, campaign and domain outputs

pub mod artifacts;
mod error;
pub mod layout;
pub mod matchups;
pub mod reference;
pub mod rows;
pub mod trace;
pub mod writer;

pub use artifacts::{
    append_tournament_rows, reset_tournament_tables, write_campaign_tables,
    write_domains_summary, write_session_artifacts,
};
pub use error::{Result, StorageError};
pub use layout::{SessionFile, discover_domains, discover_sessions, discover_tournaments, parse_ordinal};
pub use matchups::{find_matchups, load_matchups};
pub use reference::{ReferenceCache, load_domain_reference};
pub use trace::load_trace;
