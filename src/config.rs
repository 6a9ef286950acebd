//! Configuration loading and management
//!
//! Handles parsing of `homekeep.toml`. Every field has a default, so a missing
//! or partial file is fine.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::query::{SortKey, DEFAULT_CALENDAR_MAX_VISIBLE};
use crate::status::DEFAULT_UPCOMING_WINDOW_DAYS;

pub const CONFIG_FILE: &str = "homekeep.toml";
pub const STORE_FILE: &str = "tasks.json";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Task store location (defaults to the platform data dir)
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    #[serde(default)]
    pub status: StatusConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Tasks due within this many days are upcoming
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: i64,
}

fn default_upcoming_window_days() -> i64 {
    DEFAULT_UPCOMING_WINDOW_DAYS
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: default_upcoming_window_days(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Tasks listed per day before "+N more"
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

fn default_max_visible() -> usize {
    DEFAULT_CALENDAR_MAX_VISIBLE
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_visible: default_max_visible(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListConfig {
    /// Default sort for `homekeep list`: dueDate, name, or category
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

fn default_sort() -> String {
    "dueDate".to_string()
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "homekeep")
}

/// Platform config file location, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Platform data location for the task store.
pub fn default_store_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(STORE_FILE))
        .unwrap_or_else(|| PathBuf::from(STORE_FILE))
}

impl Config {
    /// Load configuration from a file, failing on parse or validation errors
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` if it exists, or return defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }

    pub fn sort_key(&self) -> crate::error::Result<SortKey> {
        self.list.default_sort.parse()
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.status.upcoming_window_days < 0 {
            return Err(crate::error::Error::InvalidConfig(
                "status.upcoming_window_days must be >= 0".to_string(),
            ));
        }
        if self.calendar.max_visible == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "calendar.max_visible must be > 0".to_string(),
            ));
        }
        self.sort_key().map_err(|err| {
            crate::error::Error::InvalidConfig(format!("list.default_sort: {err}"))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert!(cfg.store_path.is_none());
        assert_eq!(cfg.status.upcoming_window_days, 14);
        assert_eq!(cfg.calendar.max_visible, 3);
        assert_eq!(cfg.list.default_sort, "dueDate");
        assert_eq!(cfg.sort_key().expect("sort"), SortKey::DueDate);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
store_path = "/tmp/house/tasks.json"

[status]
upcoming_window_days = 7

[calendar]
max_visible = 5

[list]
default_sort = "category"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.store_path(), PathBuf::from("/tmp/house/tasks.json"));
        assert_eq!(cfg.status.upcoming_window_days, 7);
        assert_eq!(cfg.calendar.max_visible, 5);
        assert_eq!(cfg.sort_key().expect("sort"), SortKey::Category);
    }

    #[test]
    fn invalid_values_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        for content in [
            "[calendar]\nmax_visible = 0",
            "[status]\nupcoming_window_days = -1",
            "[list]\ndefault_sort = \"priority\"",
        ] {
            fs::write(&path, content).expect("write config");
            let err = Config::load(&path).expect_err("invalid config");
            match err {
                crate::error::Error::InvalidConfig(_) => {}
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn load_or_default_tolerates_missing_and_invalid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(Config::load_or_default(Some(&path)).calendar.max_visible, 3);

        fs::write(&path, "status = 12").expect("write config");
        assert_eq!(
            Config::load_or_default(Some(&path)).status.upcoming_window_days,
            14
        );
        assert!(Config::load_or_default(None).store_path.is_none());
    }
}
