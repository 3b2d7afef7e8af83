use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};

/// Default location of the provisioning configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/host/ztp/ztp_cfg.json";

/// Prefix shared by every capability flag key.
pub const FEATURE_PREFIX: &str = "feat-";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file {0} does not exist")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration file {path} is malformed: {details}")]
    Malformed { path: PathBuf, details: String },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Built-in values used for any key the configuration file does not set.
fn defaults() -> Map<String, Value> {
    let value = json!({
        "admin-mode": true,
        "ztp-service": "ztp",
        "ztp-json": "/host/ztp/ztp_data.json",
        "ztp-json-shadow": "/host/ztp/ztp_data_shadow.json",
        "ztp-activity": "/var/run/ztp/activity",
        "monitor-startup-config": true,
        "config-db-json": "/etc/sonic/config_db.json",
        "fallback-profile-json": "/host/ztp/config_db.fallback.json",
        "rollback-cmd": "/usr/lib/ztp/ztp-profile.sh remove",
        "feat-console-logging": true,
        "info-feat-console-logging": "Log provisioning progress to the system console",
        "feat-inband": true,
        "info-feat-inband": "Discover provisioning data over in-band interfaces",
        "feat-ipv4": true,
        "info-feat-ipv4": "Run DHCPv4 discovery",
        "feat-ipv6": true,
        "info-feat-ipv6": "Run DHCPv6 discovery",
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Key/value configuration: built-in defaults overlaid by the on-disk file.
///
/// Only keys present in the file are written back by [`Config::set`].
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    file: Map<String, Value>,
    defaults: Map<String, Value>,
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// A missing file falls back to defaults unless `required` is set, which
    /// is the case when the operator named the file explicitly.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let mut config = Self::with_defaults(path);
        config.file = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(ConfigError::Malformed {
                        path: path.to_path_buf(),
                        details: "top-level value is not an object".into(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Malformed {
                        path: path.to_path_buf(),
                        details: e.to_string(),
                    });
                }
            }
        } else if required {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        } else {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Map::new()
        };
        Ok(config)
    }

    /// Configuration consisting of defaults only, persisted to `path` on `set`.
    pub fn with_defaults(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            file: Map::new(),
            defaults: defaults(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.file.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Boolean value of `key`; the strings `"true"`/`"false"` are accepted too.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    fn get_path(&self, key: &str) -> PathBuf {
        self.get_str(key)
            .or_else(|| self.defaults.get(key).and_then(Value::as_str))
            .map(PathBuf::from)
            .unwrap_or_default()
    }

    /// Set `key` and write the configuration file back.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.file.insert(key.to_string(), value);
        self.save()
    }

    fn save(&self) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(&self.file).map_err(|e| ConfigError::Malformed {
            path: self.path.clone(),
            details: e.to_string(),
        })?;
        fs::write(&self.path, json + "\n").map_err(write_err)
    }

    // ── Typed accessors ─────────────────────────────────────────────────

    /// Whether provisioning is administratively enabled. Unreadable values count as enabled.
    pub fn admin_mode(&self) -> bool {
        self.get_bool("admin-mode").unwrap_or(true)
    }

    pub fn service_name(&self) -> String {
        self.get_str("ztp-service").unwrap_or("ztp").to_string()
    }

    pub fn state_paths(&self) -> StatePaths {
        StatePaths {
            primary: self.get_path("ztp-json"),
            shadow: self.get_path("ztp-json-shadow"),
        }
    }

    pub fn activity_path(&self) -> PathBuf {
        self.get_path("ztp-activity")
    }

    pub fn monitor_startup_config(&self) -> bool {
        self.get_bool("monitor-startup-config").unwrap_or(false)
    }

    pub fn startup_config_path(&self) -> PathBuf {
        self.get_path("config-db-json")
    }

    pub fn fallback_profile_path(&self) -> PathBuf {
        self.get_path("fallback-profile-json")
    }

    pub fn rollback_command(&self) -> Option<String> {
        self.get_str("rollback-cmd")
            .map(str::trim)
            .filter(|cmd| !cmd.is_empty())
            .map(String::from)
    }

    /// Every capability flag, sorted by name.
    pub fn features(&self) -> Vec<Feature> {
        let mut names: Vec<&String> = self
            .defaults
            .keys()
            .chain(self.file.keys())
            .filter(|k| k.starts_with(FEATURE_PREFIX))
            .collect();
        names.sort();
        names.dedup();

        names
            .into_iter()
            .map(|name| Feature {
                name: name.clone(),
                description: self
                    .get_str(&format!("info-{name}"))
                    .map(String::from),
                value: self.get(name).cloned().unwrap_or(Value::Null),
            })
            .collect()
    }
}

/// Locations of the persisted session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub primary: PathBuf,
    /// Stable snapshot safe to read while the session writes `primary`.
    pub shadow: PathBuf,
}

/// A capability flag and its raw configured value.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub description: Option<String>,
    pub value: Value,
}
