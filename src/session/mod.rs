//! Read-only access to the persisted session state.
//!
//! The state document is owned by the session service and may be replaced
//! between two reads; nothing here locks it.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

pub mod state;

pub use state::{SectionRecord, SessionRecord, Status};

/// Top level of the state document: `{"ztp": {...}}`.
#[derive(Deserialize)]
struct StateDocument {
    ztp: Option<Map<String, Value>>,
}

/// Load the session record at `path`.
///
/// Returns `None` when no session has written a record yet. A file that
/// cannot be read or decoded is logged and treated the same way.
pub fn load(path: &Path) -> Option<SessionRecord> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no session state file");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read session state");
            return None;
        }
    };

    let doc: StateDocument = match serde_json::from_str(&content) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "session state is not valid JSON");
            return None;
        }
    };

    let Some(ztp) = doc.ztp else {
        tracing::warn!(path = %path.display(), "session state has no `ztp` object");
        return None;
    };

    Some(SessionRecord::from_map(&ztp))
}
