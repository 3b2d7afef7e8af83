//! The live session's "current activity" side channel.
//!
//! The session service keeps a one-line file of the form
//! `<timestamp> | <what it is doing>`.

use std::fs;
use std::path::Path;

use crate::time::{Clock, elapsed_since};

/// Read the activity line and prefix it with the time spent on it.
///
/// Returns `None` if the file is missing or empty. Lines that do not carry a
/// parseable timestamp are returned as-is.
pub fn current_activity(path: &Path, clock: &dyn Clock) -> Option<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no activity available");
            return None;
        }
    };
    let line = content.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }
    Some(narrate(line, clock))
}

fn narrate(line: &str, clock: &dyn Clock) -> String {
    let Some((stamp, text)) = line.split_once('|') else {
        return line.to_string();
    };
    match elapsed_since(stamp, clock) {
        Some(elapsed) => format!("({elapsed}) {}", text.trim()),
        None => line.to_string(),
    }
}
