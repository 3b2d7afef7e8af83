#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;
use ztpctl::commands::Context;
use ztpctl::config::Config;
use ztpctl::service::{ServiceError, ServiceManager};
use ztpctl::time::Clock;

/// `2020-01-01 00:01:30 UTC`
pub const NOW_RFC3339: &str = "2020-01-01T00:01:30Z";

pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub monotonic: Option<Duration>,
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn monotonic(&self) -> Option<Duration> {
        self.monotonic
    }
}

/// In-memory service manager that records every control call.
#[derive(Default)]
pub struct FakeService {
    pub active: Cell<bool>,
    pub fail_queries: bool,
    pub activated_at: Option<Duration>,
    pub calls: RefCell<Vec<String>>,
    /// Config file whose contents are captured on every `stop`.
    pub watch_config: Option<PathBuf>,
    pub config_at_stop: RefCell<Vec<String>>,
}

impl ServiceManager for FakeService {
    fn is_active(&self, service: &str) -> Result<bool, ServiceError> {
        if self.fail_queries {
            return Err(ServiceError::Command {
                action: "is-active",
                service: service.to_string(),
                details: "Failed to connect to bus".into(),
            });
        }
        Ok(self.active.get())
    }

    fn start(&self, service: &str) -> Result<(), ServiceError> {
        self.calls.borrow_mut().push(format!("start {service}"));
        self.active.set(true);
        Ok(())
    }

    fn stop(&self, service: &str) -> Result<(), ServiceError> {
        self.calls.borrow_mut().push(format!("stop {service}"));
        if let Some(path) = &self.watch_config {
            let contents = fs::read_to_string(path).unwrap_or_default();
            self.config_at_stop.borrow_mut().push(contents);
        }
        self.active.set(false);
        Ok(())
    }

    fn activation_monotonic(&self, _: &str) -> Result<Option<Duration>, ServiceError> {
        Ok(self.activated_at)
    }
}

/// A temporary device: config file, state files and fakes for the live system.
pub struct Harness {
    pub dir: TempDir,
    pub service: FakeService,
    pub clock: FixedClock,
}

impl Harness {
    /// Harness with admin mode enabled and an inactive service.
    pub fn new() -> Self {
        Self::with_config(json!({}))
    }

    /// Harness whose config file holds the test paths plus `extra`.
    pub fn with_config(extra: Value) -> Self {
        let dir = TempDir::new().unwrap();
        let harness = Self {
            service: FakeService {
                watch_config: Some(dir.path().join("ztp_cfg.json")),
                ..Default::default()
            },
            dir,
            clock: FixedClock {
                now: DateTime::parse_from_rfc3339(NOW_RFC3339)
                    .unwrap()
                    .with_timezone(&Utc),
                monotonic: Some(Duration::from_secs(1000)),
            },
        };

        let root = harness.root();
        let mut config = json!({
            "ztp-json": root.join("ztp_data.json"),
            "ztp-json-shadow": root.join("ztp_data_shadow.json"),
            "ztp-activity": root.join("activity"),
            "config-db-json": root.join("config_db.json"),
            "fallback-profile-json": root.join("config_db.fallback.json"),
            "rollback-cmd": format!("touch {}", root.join("rolled-back").display()),
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut config, extra) {
            base.extend(extra);
        }
        fs::write(harness.config_path(), serde_json::to_string_pretty(&config).unwrap()).unwrap();
        harness
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("ztp_cfg.json")
    }

    pub fn primary_path(&self) -> PathBuf {
        self.root().join("ztp_data.json")
    }

    pub fn shadow_path(&self) -> PathBuf {
        self.root().join("ztp_data_shadow.json")
    }

    pub fn activity_path(&self) -> PathBuf {
        self.root().join("activity")
    }

    pub fn startup_config_path(&self) -> PathBuf {
        self.root().join("config_db.json")
    }

    pub fn config_contents(&self) -> String {
        fs::read_to_string(self.config_path()).unwrap()
    }

    pub fn admin_mode_on_disk(&self) -> Option<bool> {
        let raw: Value = serde_json::from_str(&self.config_contents()).unwrap();
        match raw.get("admin-mode")? {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Write the same state document to the primary and shadow files.
    pub fn write_state(&self, ztp: Value) {
        let doc = json!({ "ztp": ztp }).to_string();
        fs::write(self.primary_path(), &doc).unwrap();
        fs::write(self.shadow_path(), &doc).unwrap();
    }

    pub fn context(&self, privileged: bool) -> Context<'_> {
        Context {
            config: Config::load(&self.config_path(), true).unwrap(),
            manager: &self.service,
            clock: &self.clock,
            privileged,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.service.calls.borrow().clone()
    }
}
