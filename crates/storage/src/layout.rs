//! Results-directory discovery.
//!
//! ```text
//! results/
//!   Tournament_2024-05-01-120000/
//!     tournament_steps.json            (optional matchup list)
//!     session_1.json                   (or session_1/session_results_trace.json)
//!     session_2.json
//! domains/
//!   domain00/specials.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use types::{DomainId, Ordinal};

use crate::error::{Result, StorageError};

const SESSION_PREFIX: &str = "session_";
/// Trace file name inside a per-session directory.
pub const NESTED_TRACE_FILE: &str = "session_results_trace.json";

/// One session trace inside a tournament directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    pub ordinal: Ordinal,
    pub path: PathBuf,
}

/// Ordinal from a `session_<n>` or `session_<n>.json` name.
pub fn parse_ordinal(name: &str) -> Option<Ordinal> {
    let digits = name.strip_prefix(SESSION_PREFIX)?;
    let digits = digits.strip_suffix(".json").unwrap_or(digits);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(Ordinal)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .map_err(StorageError::io(dir))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(StorageError::io(dir))?;
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()
}

/// Session traces in `tournament_dir`, ordered by ordinal.
pub fn discover_sessions(tournament_dir: &Path) -> Result<Vec<SessionFile>> {
    let mut sessions = Vec::new();
    for path in read_dir_sorted(tournament_dir)? {
        let Some(ordinal) = file_name(&path).and_then(parse_ordinal) else {
            continue;
        };
        let trace = if path.is_dir() {
            let nested = path.join(NESTED_TRACE_FILE);
            if !nested.is_file() {
                continue;
            }
            nested
        } else {
            path
        };
        sessions.push(SessionFile {
            ordinal,
            path: trace,
        });
    }

    sessions.sort_by_key(|session| session.ordinal);
    if let Some(pair) = sessions.windows(2).find(|pair| pair[0].ordinal == pair[1].ordinal) {
        return Err(StorageError::InvalidLayout(format!(
            "session {} appears twice in {}",
            pair[0].ordinal,
            tournament_dir.display()
        )));
    }
    Ok(sessions)
}

/// Tournament directories in `results_dir` whose name contains `marker`.
pub fn discover_tournaments(results_dir: &Path, marker: &str) -> Result<Vec<PathBuf>> {
    Ok(read_dir_sorted(results_dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter(|path| file_name(path).is_some_and(|name| name.contains(marker)))
        .collect())
}

/// Domain directories in `domains_dir`, ordered by name.
pub fn discover_domains(domains_dir: &Path) -> Result<Vec<(DomainId, PathBuf)>> {
    Ok(read_dir_sorted(domains_dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let domain = DomainId::from(file_name(&path)?);
            Some((domain, path))
        })
        .collect())
}
