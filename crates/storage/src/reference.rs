//! Domain reference loading.
//!
//! Each domain directory holds a precomputed `specials.json` with the Pareto
//! frontier, Nash point and Kalai point. A run loads each domain at most once.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use types::{DomainId, DomainReference};

use crate::error::{Result, StorageError};

/// File name of a domain's precomputed reference points.
pub const SPECIALS_FILE: &str = "specials.json";

pub fn reference_path(domains_dir: &Path, domain: &DomainId) -> PathBuf {
    domains_dir.join(domain.as_str()).join(SPECIALS_FILE)
}

/// Load `<domains_dir>/<domain>/specials.json`.
pub fn load_domain_reference(domains_dir: &Path, domain: &DomainId) -> Result<DomainReference> {
    let path = reference_path(domains_dir, domain);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StorageError::MissingReference {
                domain: domain.clone(),
                path,
            });
        }
        Err(err) => return Err(StorageError::io(&path)(err)),
    };
    serde_json::from_str(&text).map_err(StorageError::json(&path))
}

/// Per-run cache of domain references.
///
/// Failures are cached too, so a broken domain is reported once rather than
/// once per session. Fill it with [`ReferenceCache::ensure`] before handing
/// shared references to parallel workers.
#[derive(Debug)]
pub struct ReferenceCache {
    domains_dir: PathBuf,
    loaded: BTreeMap<DomainId, DomainReference>,
    failed: BTreeMap<DomainId, String>,
}

impl ReferenceCache {
    pub fn new(domains_dir: impl Into<PathBuf>) -> Self {
        Self {
            domains_dir: domains_dir.into(),
            loaded: BTreeMap::new(),
            failed: BTreeMap::new(),
        }
    }

    /// Load `domain` unless it was already attempted.
    pub fn ensure(&mut self, domain: &DomainId) -> Option<&DomainReference> {
        if !self.loaded.contains_key(domain) && !self.failed.contains_key(domain) {
            match load_domain_reference(&self.domains_dir, domain) {
                Ok(reference) => {
                    debug!(%domain, pareto_points = reference.pareto_front.len(), "loaded domain reference");
                    self.loaded.insert(domain.clone(), reference);
                }
                Err(err) => {
                    warn!(%domain, error = %err, "domain reference unavailable, distance metrics skipped");
                    self.failed.insert(domain.clone(), err.to_string());
                }
            }
        }
        self.loaded.get(domain)
    }

    pub fn get(&self, domain: &DomainId) -> Option<&DomainReference> {
        self.loaded.get(domain)
    }

    /// Domains whose reference could not be loaded, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&DomainId, &str)> {
        self.failed
            .iter()
            .map(|(domain, reason)| (domain, reason.as_str()))
    }
}
