//! Error types for trace analytics.

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Failures that make a single session unanalysable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyticsError {
    /// Fewer than two distinct actors were declared in the trace.
    #[error("identity resolution failed: expected 2 distinct actors, found {observed}")]
    IdentityResolution { observed: usize },

    /// The seat-A profile does not name a domain directory.
    #[error("cannot derive a domain id from profile '{profile}'")]
    UnknownDomain { profile: String },
}
