use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::activity;
use crate::config::Config;
use crate::service::{self, ServiceManager};
use crate::session::{self, SessionRecord, Status};
use crate::time::Clock;

pub mod renderer;
pub mod theme;

/// Lifecycle state derived from admin mode, the live service and the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Disabled,
    Inactive,
    /// The service is running but has not written a record yet.
    ActiveDiscovery,
    NotStarted,
    InProgress,
    Success,
    Failed,
}

impl LifecycleState {
    /// The single-line machine-readable form printed by `status -c`.
    pub fn code(self) -> &'static str {
        match self {
            LifecycleState::Disabled => "0:DISABLED",
            LifecycleState::Inactive => "1:INACTIVE",
            LifecycleState::ActiveDiscovery => "2:ACTIVE-DISCOVERY",
            LifecycleState::NotStarted => "3:NOT-STARTED",
            LifecycleState::InProgress => "4:IN-PROGRESS",
            LifecycleState::Success => "5:SUCCESS",
            LifecycleState::Failed => "6:FAILED",
        }
    }
}

/// Reconcile the three sources of truth into one state.
///
/// Admin mode wins over everything; a record wins over the live service.
/// A record whose status is missing or unrecognised counts as not started.
pub fn reconcile(admin_mode: bool, active: bool, record: Option<&SessionRecord>) -> LifecycleState {
    if !admin_mode {
        return LifecycleState::Disabled;
    }
    match record {
        Some(record) => match record.status {
            Some(Status::InProgress) => LifecycleState::InProgress,
            Some(Status::Success) => LifecycleState::Success,
            Some(Status::Failed) => LifecycleState::Failed,
            Some(Status::NotStarted) | None => LifecycleState::NotStarted,
        },
        None if active => LifecycleState::ActiveDiscovery,
        None => LifecycleState::Inactive,
    }
}

/// Everything a status view needs, gathered once per invocation.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub admin_mode: bool,
    pub active: bool,
    pub record: Option<SessionRecord>,
    /// Activity narrative; only collected for privileged callers of an active service.
    pub activity: Option<String>,
    /// Time the service has been active without a record.
    pub discovery_runtime: Option<Duration>,
    pub now: DateTime<Utc>,
}

impl StatusSnapshot {
    /// Query configuration, the service manager and the state files.
    ///
    /// Reads the shadow state file, which the session service only replaces
    /// with complete snapshots.
    pub fn gather(
        config: &Config,
        manager: &dyn ServiceManager,
        clock: &dyn Clock,
        privileged: bool,
    ) -> Self {
        let service_name = config.service_name();
        let admin_mode = config.admin_mode();
        let active = service::is_active(manager, &service_name);
        let record = session::load(&config.state_paths().shadow);

        let activity = if active && privileged {
            activity::current_activity(&config.activity_path(), clock)
        } else {
            None
        };
        let discovery_runtime = if active && record.is_none() {
            service::active_duration(manager, clock, &service_name)
        } else {
            None
        };

        tracing::debug!(admin_mode, active, has_record = record.is_some(), "gathered status");

        Self {
            admin_mode,
            active,
            record,
            activity,
            discovery_runtime,
            now: clock.now(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        reconcile(self.admin_mode, self.active, self.record.as_ref())
    }
}
