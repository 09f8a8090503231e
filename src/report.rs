//! End-of-run summary of what was analysed and what was left out.

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};
use types::{DomainId, Ordinal};

/// A session that could not be analysed.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub path: PathBuf,
    pub ordinal: Option<Ordinal>,
    pub reason: String,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(ordinal) => write!(f, "session {ordinal} ({}): {}", self.path.display(), self.reason),
            None => write!(f, "{}: {}", self.path.display(), self.reason),
        }
    }
}

/// Counters collected across one command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub sessions_analysed: usize,
    pub exclusions: Vec<Exclusion>,
    /// Domains whose reference could not be loaded.
    pub missing_domains: Vec<(DomainId, String)>,
    /// Tournament directories that could not be processed at all.
    pub skipped_tournaments: Vec<(PathBuf, String)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an excluded session and log it with its location.
    pub fn exclude(
        &mut self,
        path: impl Into<PathBuf>,
        ordinal: Option<Ordinal>,
        reason: impl fmt::Display,
    ) {
        let exclusion = Exclusion {
            path: path.into(),
            ordinal,
            reason: reason.to_string(),
        };
        warn!(path = %exclusion.path.display(), ordinal = ?exclusion.ordinal, reason = %exclusion.reason, "session excluded");
        self.exclusions.push(exclusion);
    }

    pub fn missing_domain(&mut self, domain: DomainId, reason: impl Into<String>) {
        if !self.missing_domains.iter().any(|(known, _)| known == &domain) {
            self.missing_domains.push((domain, reason.into()));
        }
    }

    pub fn skip_tournament(&mut self, dir: impl Into<PathBuf>, reason: impl fmt::Display) {
        let dir = dir.into();
        let reason = reason.to_string();
        warn!(dir = %dir.display(), %reason, "tournament skipped");
        self.skipped_tournaments.push((dir, reason));
    }

    /// Fold a sub-run's report into this one.
    pub fn absorb(&mut self, other: RunReport) {
        self.sessions_analysed += other.sessions_analysed;
        self.exclusions.extend(other.exclusions);
        for (domain, reason) in other.missing_domains {
            self.missing_domain(domain, reason);
        }
        self.skipped_tournaments.extend(other.skipped_tournaments);
    }

    pub fn is_clean(&self) -> bool {
        self.exclusions.is_empty()
            && self.missing_domains.is_empty()
            && self.skipped_tournaments.is_empty()
    }

    pub fn log(&self) {
        info!(
            analysed = self.sessions_analysed,
            excluded = self.exclusions.len(),
            missing_domains = self.missing_domains.len(),
            skipped_tournaments = self.skipped_tournaments.len(),
            "run complete"
        );
        if self.is_clean() {
            return;
        }
        for exclusion in &self.exclusions {
            info!("  excluded {exclusion}");
        }
        for (domain, reason) in &self.missing_domains {
            info!("  no reference for {domain}: {reason}");
        }
        for (dir, reason) in &self.skipped_tournaments {
            info!("  skipped tournament {}: {reason}", dir.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_display() {
        let exclusion = Exclusion {
            path: PathBuf::from("t/session_3.json"),
            ordinal: Some(Ordinal(3)),
            reason: "identity resolution failed".to_string(),
        };
        assert_eq!(
            exclusion.to_string(),
            "session 3 (t/session_3.json): identity resolution failed"
        );
    }

    #[test]
    fn test_absorb_deduplicates_domains() {
        let mut report = RunReport::new();
        report.sessions_analysed = 2;
        report.missing_domain(DomainId::from("domain03"), "absent");

        let mut other = RunReport::new();
        other.sessions_analysed = 3;
        other.missing_domain(DomainId::from("domain03"), "absent");
        other.exclude("x.json", None, "unreadable");

        report.absorb(other);
        assert_eq!(report.sessions_analysed, 5);
        assert_eq!(report.missing_domains.len(), 1);
        assert_eq!(report.exclusions.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_new_report_is_clean() {
        assert!(RunReport::new().is_clean());
    }
}
