//! Global agenda configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::clock::WeekdayNames;
use crate::constants::DEFAULT_REMINDER_INTERVAL_SECS;
use crate::error::{AgendaError, AgendaResult};
use crate::notify::Permission;

static DEFAULT_DATA_DIR: &str = "~/.local/share/agenda";
static DEFAULT_NOTIFICATION_TITLE: &str = "Event reminder";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

fn default_reminder_interval() -> String {
    format!("{DEFAULT_REMINDER_INTERVAL_SECS}s")
}

fn default_notification_title() -> String {
    DEFAULT_NOTIFICATION_TITLE.to_string()
}

/// Configuration at ~/.config/agenda/config.toml
///
/// Values can be overridden with `AGENDA_`-prefixed environment variables,
/// e.g. `AGENDA_DATA_DIR`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AgendaConfig {
    /// Where the event snapshots live
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    /// Period between reminder checks, e.g. "60s" or "2m"
    #[serde(default = "default_reminder_interval")]
    pub reminder_interval: String,

    /// Language of weekday names in custom recurrence rules
    #[serde(default)]
    pub weekday_names: WeekdayNames,

    #[serde(default)]
    pub notifications: Permission,

    #[serde(default = "default_notification_title")]
    pub notification_title: String,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            data_dir: default_data_dir(),
            reminder_interval: default_reminder_interval(),
            weekday_names: WeekdayNames::default(),
            notifications: Permission::default(),
            notification_title: default_notification_title(),
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first run.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> AgendaResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("AGENDA"))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn reminder_period(&self) -> AgendaResult<Duration> {
        let period = humantime::parse_duration(&self.reminder_interval).map_err(|e| {
            AgendaError::Config(format!(
                "Invalid reminder_interval '{}': {e}",
                self.reminder_interval
            ))
        })?;

        if period.is_zero() {
            return Err(AgendaError::Config(
                "reminder_interval must be greater than zero".into(),
            ));
        }
        Ok(period)
    }

    /// Save to ~/.config/agenda/config.toml
    pub fn save(&self) -> AgendaResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AgendaResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| AgendaError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Where events are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# How often to check for due reminders:
# reminder_interval = \"{}\"

# Weekday names used by custom recurrence (english or spanish):
# weekday_names = \"english\"

# Desktop notifications (granted, denied or default to ask once):
# notifications = \"default\"

# notification_title = \"{DEFAULT_NOTIFICATION_TITLE}\"
",
            default_reminder_interval()
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
