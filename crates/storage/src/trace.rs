//! Trace file loading.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use types::NegotiationTrace;

use crate::error::{Result, StorageError};

/// Read and parse one negotiation trace.
///
/// Malformed individual actions are skipped and counted on the trace; only an
/// unreadable file or a document that is not a JSON object is an error.
pub fn load_trace(path: &Path) -> Result<NegotiationTrace> {
    let text = fs::read_to_string(path).map_err(StorageError::io(path))?;
    let trace: NegotiationTrace = serde_json::from_str(&text).map_err(StorageError::json(path))?;

    if trace.skipped_actions > 0 {
        debug!(path = %path.display(), skipped = trace.skipped_actions, "skipped malformed actions");
    }
    if let Some(error) = &trace.protocol_error {
        warn!(path = %path.display(), %error, "trace reports a protocol error");
    }
    Ok(trace)
}
