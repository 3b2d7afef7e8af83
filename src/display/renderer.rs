use std::io::{self, IsTerminal, Write};

use crossterm::style::ContentStyle;

use super::{StatusSnapshot, theme};
use crate::session::{SectionRecord, SessionRecord, Status};
use crate::time::{format_duration, format_timestamp, timestamp_delta};

/// Width of the label column; fits the longest label, `ZTP JSON Version`.
const LABEL_WIDTH: usize = 16;

/// Placeholder for values that exist but could not be computed.
const UNKNOWN: &str = "unknown";

const BANNER_RULE: &str = "========================================";
const SECTION_RULE: &str = "----------------------------------------";

/// Writes the coded, terse and verbose status reports.
pub struct Renderer<W: Write = io::Stdout> {
    /// Whether to emit ANSI styles.
    styled: bool,
    /// Writer for output.
    out: W,
}

impl Default for Renderer<io::Stdout> {
    fn default() -> Self {
        let out = io::stdout();
        let styled = out.is_terminal();
        let mut renderer = Self::with_writer(out);
        renderer.set_styled(styled);
        renderer
    }
}

impl Renderer<io::Stdout> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Write> Renderer<W> {
    /// Render into `writer` without styles.
    pub fn with_writer(writer: W) -> Self {
        Self {
            styled: false,
            out: writer,
        }
    }

    pub fn set_styled(&mut self, styled: bool) {
        self.styled = styled;
    }

    // --- Views ---

    /// Exactly one line: the numeric code and name of the lifecycle state.
    pub fn render_coded(&mut self, snap: &StatusSnapshot) -> io::Result<()> {
        writeln!(self.out, "{}", snap.state().code())?;
        self.out.flush()
    }

    pub fn render_terse(&mut self, snap: &StatusSnapshot) -> io::Result<()> {
        self.render_summary(snap)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", narrative(snap))?;

        if let Some(record) = &snap.record
            && !record.sections.is_empty()
        {
            writeln!(self.out)?;
            for (name, section) in &record.sections {
                let label = self.status_label(section.status);
                writeln!(self.out, "{name}: {label}")?;
            }
        }
        self.out.flush()
    }

    pub fn render_verbose(&mut self, snap: &StatusSnapshot) -> io::Result<()> {
        writeln!(self.out, "{BANNER_RULE}")?;
        writeln!(self.out, "{}", self.paint(theme::heading(), "ZTP"))?;
        writeln!(self.out, "{BANNER_RULE}")?;
        self.render_summary(snap)?;

        if let Some(record) = &snap.record {
            self.render_session_details(record)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "{}", narrative(snap))?;

        if let Some(record) = &snap.record {
            let now = format_timestamp(snap.now);
            for (name, section) in &record.sections {
                self.render_section(name, section, &now)?;
            }
        }
        self.out.flush()
    }

    // --- Building blocks ---

    /// Header fields shared by the terse and verbose views.
    fn render_summary(&mut self, snap: &StatusSnapshot) -> io::Result<()> {
        let now = format_timestamp(snap.now);
        let record = snap.record.as_ref();

        self.field("ZTP Admin Mode", bool_label(snap.admin_mode))?;
        self.field("ZTP Service", service_label(snap))?;
        let status = self.status_label(record.and_then(|r| r.status));
        self.field("ZTP Status", &status)?;

        let Some(record) = record else {
            if let Some(elapsed) = snap.discovery_runtime {
                self.field("Runtime", &format_duration(elapsed.as_secs()))?;
            }
            return Ok(());
        };

        if let Some(source) = &record.source {
            self.field("ZTP Source", source)?;
        }
        if let Some(runtime) = runtime(
            record.status,
            record.start_timestamp.as_deref(),
            record.timestamp.as_deref(),
            &now,
        ) {
            self.field("Runtime", &runtime)?;
        }
        if let Some(timestamp) =
            current_timestamp(record.status, record.timestamp.as_deref(), &now)
        {
            self.field("Timestamp", timestamp)?;
        }
        Ok(())
    }

    /// Session-level fields only the verbose view shows.
    fn render_session_details(&mut self, record: &SessionRecord) -> io::Result<()> {
        if let Some(version) = &record.version {
            self.field("ZTP JSON Version", version)?;
        }
        if let Some(error) = &record.error {
            let error = self.paint(theme::error(), error);
            self.field("Error", &error)?;
        }
        if let Some(ignore) = record.ignore_result {
            self.field("Ignore Result", bool_label(ignore))?;
        }
        Ok(())
    }

    fn render_section(&mut self, name: &str, section: &SectionRecord, now: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{SECTION_RULE}")?;
        writeln!(self.out, "{}", self.paint(theme::heading(), name))?;
        writeln!(self.out, "{SECTION_RULE}")?;

        if let Some(description) = &section.description {
            self.section_field("Description", description)?;
        }
        let status = self.status_label(section.status);
        self.section_field("Status", &status)?;
        if let Some(runtime) = runtime(
            section.status,
            section.start_timestamp.as_deref(),
            section.timestamp.as_deref(),
            now,
        ) {
            self.section_field("Runtime", &runtime)?;
        }
        if let Some(timestamp) =
            current_timestamp(section.status, section.timestamp.as_deref(), now)
        {
            self.section_field("Timestamp", timestamp)?;
        }
        if let Some(code) = section.exit_code {
            self.section_field("Exit Code", &code.to_string())?;
        }
        if let Some(error) = &section.error {
            let error = self.paint(theme::error(), error);
            self.section_field("Error", &error)?;
        }
        self.section_field("Ignore Result", bool_label(section.ignore_result))?;
        if section.halt_on_failure == Some(true) {
            self.section_field("Halt on Failure", bool_label(true))?;
        }
        Ok(())
    }

    fn field(&mut self, label: &str, value: &str) -> io::Result<()> {
        writeln!(self.out, "{label:<LABEL_WIDTH$}: {value}")
    }

    fn section_field(&mut self, label: &str, value: &str) -> io::Result<()> {
        let label = self.paint(theme::dim(), &format!("{label:<LABEL_WIDTH$}"));
        writeln!(self.out, "{label}: {value}")
    }

    fn status_label(&self, status: Option<Status>) -> String {
        let label = status.map_or(Status::NotStarted.label(), Status::label);
        self.paint(theme::status(status), label)
    }

    fn paint(&self, style: ContentStyle, text: &str) -> String {
        if self.styled {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn bool_label(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn service_label(snap: &StatusSnapshot) -> &'static str {
    match (snap.active, snap.record.is_some()) {
        (false, _) => "Inactive",
        (true, true) => "Processing",
        (true, false) => "Active Discovery",
    }
}

/// One line describing what the service is doing right now.
fn narrative(snap: &StatusSnapshot) -> String {
    if !snap.active {
        return "ZTP Service is not running".to_string();
    }
    snap.activity
        .clone()
        .unwrap_or_else(|| "ZTP Service is active".to_string())
}

/// Timestamp to show for a record: a running record is current as of `now`.
fn current_timestamp<'a>(
    status: Option<Status>,
    stored: Option<&'a str>,
    now: &'a str,
) -> Option<&'a str> {
    if status == Some(Status::InProgress) {
        Some(now)
    } else {
        stored
    }
}

/// Runtime for a record in `status`, or `None` when it has no runtime to show.
///
/// In-progress records run until `now`; finished ones until their own timestamp.
fn runtime(status: Option<Status>, start: Option<&str>, end: Option<&str>, now: &str) -> Option<String> {
    let status = status.filter(|s| s.has_runtime())?;
    let end = if status == Status::InProgress {
        Some(now)
    } else {
        end
    };
    let elapsed = start
        .zip(end)
        .and_then(|(start, end)| timestamp_delta(start, end));
    Some(elapsed.unwrap_or_else(|| UNKNOWN.to_string()))
}
