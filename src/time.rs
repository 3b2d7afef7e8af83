//! Elapsed-time helpers for session timestamps.
//!
//! Timestamps written by the session service look like
//! `2020-01-01 00:00:00 UTC`. Every function here degrades to `None` on
//! input it cannot parse; callers render that as "unknown".

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Wall-clock layout shared with the session service, minus the zone.
const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone abbreviations the session service is known to emit, with their UTC offset in minutes.
const ZONE_ABBREVIATIONS: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("EST", -5 * 60),
    ("EDT", -4 * 60),
    ("CST", -6 * 60),
    ("CDT", -5 * 60),
    ("MST", -7 * 60),
    ("MDT", -6 * 60),
    ("PST", -8 * 60),
    ("PDT", -7 * 60),
    ("CET", 60),
    ("CEST", 2 * 60),
    ("EET", 2 * 60),
    ("EEST", 3 * 60),
    ("IST", 5 * 60 + 30),
    ("JST", 9 * 60),
];

/// Source of "now" for runtime computations.
pub trait Clock {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Time since boot on the monotonic clock, if it can be read.
    fn monotonic(&self) -> Option<Duration>;
}

/// The real system clocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Option<Duration> {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &raw mut ts) };
        if rc != 0 {
            return None;
        }
        let secs = u64::try_from(ts.tv_sec).ok()?;
        let nanos = u32::try_from(ts.tv_nsec).ok()?;
        Some(Duration::new(secs, nanos))
    }
}

/// Format elapsed seconds as `SSs`, `MMm SSs` or `HHh MMm SSs`.
///
/// The coarsest unit shown is the largest one that is non-zero.
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if secs < 60 {
        format!("{seconds:02}s")
    } else if secs < 3600 {
        format!("{minutes:02}m {seconds:02}s")
    } else {
        format!("{hours:02}h {minutes:02}m {seconds:02}s")
    }
}

/// Render a timestamp in the session service's own layout.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    format!("{} UTC", at.format(TIMESTAMP_LAYOUT))
}

/// Parse `YYYY-MM-DD HH:MM:SS TZ`, tolerating surrounding whitespace.
///
/// `TZ` is either a known abbreviation or a numeric offset such as `+0530`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let (wall, zone) = raw.trim().rsplit_once(' ')?;
    let offset = parse_zone(zone)?;
    let naive = NaiveDateTime::parse_from_str(wall.trim_end(), TIMESTAMP_LAYOUT).ok()?;
    naive.and_local_timezone(offset).single()
}

fn parse_zone(zone: &str) -> Option<FixedOffset> {
    if let Some((_, minutes)) = ZONE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(zone))
    {
        return FixedOffset::east_opt(minutes * 60);
    }

    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    let digits = digits.replace(':', "");
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Signed seconds from `start` to `end`, or `None` if either fails to parse.
pub fn delta_seconds(start: &str, end: &str) -> Option<i64> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    Some(end.signed_duration_since(start).num_seconds())
}

/// Formatted elapsed time from `start` to `end`.
///
/// Returns `None` when either timestamp is malformed or `end` precedes `start`.
pub fn timestamp_delta(start: &str, end: &str) -> Option<String> {
    let secs = delta_seconds(start, end)?;
    let secs = u64::try_from(secs).ok()?;
    Some(format_duration(secs))
}

/// Formatted elapsed time from `start` until the clock's current time.
pub fn elapsed_since(start: &str, clock: &dyn Clock) -> Option<String> {
    timestamp_delta(start, &format_timestamp(clock.now()))
}
