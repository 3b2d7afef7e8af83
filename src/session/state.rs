use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Progress of a session or of one of its sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NotStarted,
    InProgress,
    Success,
    Failed,
}

impl Status {
    /// Decode the on-disk spelling (`BOOT`, `IN-PROGRESS`, `SUCCESS`, `FAILED`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BOOT" | "NOT-STARTED" => Some(Status::NotStarted),
            "IN-PROGRESS" => Some(Status::InProgress),
            "SUCCESS" => Some(Status::Success),
            "FAILED" => Some(Status::Failed),
            _ => None,
        }
    }

    /// Human label used in the terse and verbose reports.
    pub fn label(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "IN-PROGRESS",
            Status::Success => "SUCCESS",
            Status::Failed => "FAILED",
        }
    }

    /// Whether a runtime can be derived from the timestamps of a record in this state.
    pub fn has_runtime(self) -> bool {
        !matches!(self, Status::NotStarted)
    }
}

/// The `ztp` object of the persisted state document.
///
/// Every field is optional: the session service writes the record
/// incrementally and readers may observe any prefix of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionRecord {
    pub status: Option<Status>,
    pub source: Option<String>,
    pub version: Option<String>,
    pub start_timestamp: Option<String>,
    pub timestamp: Option<String>,
    pub error: Option<String>,
    pub ignore_result: Option<bool>,
    /// Sections keyed by name; iteration order is the rendering order.
    pub sections: BTreeMap<String, SectionRecord>,
}

/// One named step of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionRecord {
    pub status: Option<Status>,
    pub description: Option<String>,
    pub start_timestamp: Option<String>,
    pub timestamp: Option<String>,
    pub exit_code: Option<i64>,
    pub error: Option<String>,
    pub ignore_result: bool,
    pub halt_on_failure: Option<bool>,
}

impl SessionRecord {
    /// Build a record from the decoded `ztp` object.
    ///
    /// Scalar keys are session fields; every object-valued key is a section.
    /// Values of the wrong type are treated as absent.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let sections = map
            .iter()
            .filter_map(|(name, value)| {
                value
                    .as_object()
                    .map(|obj| (name.clone(), SectionRecord::from_map(obj)))
            })
            .collect();

        Self {
            status: status_field(map, "status"),
            source: str_field(map, "ztp-json-source"),
            version: text_field(map, "ztp-json-version"),
            start_timestamp: str_field(map, "start-timestamp"),
            timestamp: str_field(map, "timestamp"),
            error: str_field(map, "error"),
            ignore_result: bool_field(map, "ignore-result"),
            sections,
        }
    }
}

impl SectionRecord {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            status: status_field(map, "status"),
            description: str_field(map, "description"),
            start_timestamp: str_field(map, "start-timestamp"),
            timestamp: str_field(map, "timestamp"),
            exit_code: map.get("exit-code").and_then(Value::as_i64),
            error: str_field(map, "error"),
            ignore_result: bool_field(map, "ignore-result").unwrap_or(false),
            halt_on_failure: bool_field(map, "halt-on-failure"),
        }
    }
}

// ── Lenient field accessors ─────────────────────────────────────────────

fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(String::from)
}

/// Like `str_field`, but numbers are stringified (`"ztp-json-version": 1.0`).
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn bool_field(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn status_field(map: &Map<String, Value>, key: &str) -> Option<Status> {
    map.get(key).and_then(Value::as_str).and_then(Status::parse)
}
