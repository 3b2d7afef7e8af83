//! Terminal display styles.
//!
//! All styles use only named ANSI colors so that colors adapt to the user's
//! terminal theme. Styles are applied only when stdout is a terminal; piped
//! output stays plain so scripts can match it.

use crossterm::style::{Attribute, Color, ContentStyle};

use crate::session::Status;

pub fn heading() -> ContentStyle {
    ContentStyle {
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}

pub fn dim() -> ContentStyle {
    ContentStyle {
        attributes: Attribute::Dim.into(),
        ..Default::default()
    }
}

pub fn error() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Red),
        ..Default::default()
    }
}

/// Color for a status label: green on success, red on failure, yellow while running.
pub fn status(status: Option<Status>) -> ContentStyle {
    let foreground_color = match status {
        Some(Status::Success) => Some(Color::Green),
        Some(Status::Failed) => Some(Color::Red),
        Some(Status::InProgress) => Some(Color::Yellow),
        Some(Status::NotStarted) | None => None,
    };
    ContentStyle {
        foreground_color,
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}
