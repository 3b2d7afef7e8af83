//! Live service-manager queries and control.
//!
//! The real implementation shells out to `systemctl`; calls block until the
//! service manager answers, with no timeout.

use std::process::{Command, Stdio};
use std::time::Duration;

use crate::time::Clock;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to run systemctl: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("systemctl {action} {service} failed: {details}")]
    Command {
        action: &'static str,
        service: String,
        details: String,
    },
}

/// Process-control capability used by status and lifecycle commands.
pub trait ServiceManager {
    /// Whether the service manager reports the unit as active.
    fn is_active(&self, service: &str) -> Result<bool, ServiceError>;

    fn start(&self, service: &str) -> Result<(), ServiceError>;

    fn stop(&self, service: &str) -> Result<(), ServiceError>;

    /// Monotonic-clock instant at which the unit last became active.
    fn activation_monotonic(&self, service: &str) -> Result<Option<Duration>, ServiceError>;
}

/// `ServiceManager` backed by systemd.
#[derive(Debug, Default, Clone, Copy)]
pub struct Systemctl;

impl Systemctl {
    /// Run `systemctl <args>` and return stdout, failing on a non-zero exit.
    fn systemctl(action: &'static str, service: &str, args: &[&str]) -> Result<String, ServiceError> {
        let output = Command::new("systemctl")
            .args(args)
            .arg(service)
            .stdin(Stdio::null())
            .output()
            .map_err(ServiceError::Spawn)?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ServiceError::Command {
                action,
                service: service.to_string(),
                details: stderr.trim().to_string(),
            })
        }
    }
}

impl ServiceManager for Systemctl {
    fn is_active(&self, service: &str) -> Result<bool, ServiceError> {
        // `is-active` exits non-zero for every state but "active".
        let output = Command::new("systemctl")
            .arg("is-active")
            .arg(service)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(ServiceError::Spawn)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim() == "active")
    }

    fn start(&self, service: &str) -> Result<(), ServiceError> {
        Self::systemctl("start", service, &["start"]).map(drop)
    }

    fn stop(&self, service: &str) -> Result<(), ServiceError> {
        Self::systemctl("stop", service, &["stop"]).map(drop)
    }

    fn activation_monotonic(&self, service: &str) -> Result<Option<Duration>, ServiceError> {
        let out = Self::systemctl(
            "show",
            service,
            &["show", "--property=ActiveEnterTimestampMonotonic", "--value"],
        )?;
        Ok(parse_monotonic_micros(&out))
    }
}

/// Parse systemd's microsecond counter; `0` means the unit was never activated.
fn parse_monotonic_micros(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("ActiveEnterTimestampMonotonic=")
        .unwrap_or(raw);
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(micros) => Some(Duration::from_micros(micros)),
    }
}

/// Whether `service` is running. Query failures count as not running.
pub fn is_active(manager: &dyn ServiceManager, service: &str) -> bool {
    match manager.is_active(service) {
        Ok(active) => active,
        Err(e) => {
            tracing::debug!(service, error = %e, "service query failed, assuming inactive");
            false
        }
    }
}

/// How long `service` has been active, measured on the monotonic clock.
///
/// Used while a session is running but has not written its first record.
/// Any failure yields `None`.
pub fn active_duration(
    manager: &dyn ServiceManager,
    clock: &dyn Clock,
    service: &str,
) -> Option<Duration> {
    if !is_active(manager, service) {
        return None;
    }
    let entered = match manager.activation_monotonic(service) {
        Ok(entered) => entered?,
        Err(e) => {
            tracing::debug!(service, error = %e, "activation timestamp unavailable");
            return None;
        }
    };
    clock.monotonic()?.checked_sub(entered)
}
