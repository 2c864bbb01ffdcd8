use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::i18n::Locale;
use crate::theme::Theme;

pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 3600;
pub const MAX_DURATION_SECONDS: u32 = MAX_MINUTES * 60;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Errors raised at the configuration boundary. None of these ever reach the
/// timer engine; invalid input leaves the engine untouched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{0}' is not a whole number of minutes")]
    NotANumber(String),

    #[error("{value} is outside the allowed range of 1-3600 minutes")]
    OutOfRange { value: u64 },

    #[error("volume {0} must be between 0 and 1")]
    InvalidVolume(f32),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a minutes field as typed by the user.
pub fn parse_minutes(input: &str) -> Result<u32, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::NotANumber(trimmed.to_string()));
    }
    // digits only, so the only way to fail here is overflow
    let value = trimmed
        .parse::<u64>()
        .map_err(|_| ConfigError::OutOfRange { value: u64::MAX })?;
    check_minutes(value)
}

fn check_minutes(value: u64) -> Result<u32, ConfigError> {
    if (MIN_MINUTES as u64..=MAX_MINUTES as u64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ConfigError::OutOfRange { value })
    }
}

pub fn check_volume(volume: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(ConfigError::InvalidVolume(volume))
    }
}

/// Work and break durations, in seconds. Both are always in
/// `1..=MAX_DURATION_SECONDS`; the only constructors validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfiguration {
    work_secs: u32,
    break_secs: u32,
}

impl TimerConfiguration {
    pub fn from_minutes(work_minutes: u32, break_minutes: u32) -> Result<Self, ConfigError> {
        let work = check_minutes(work_minutes as u64)?;
        let brk = check_minutes(break_minutes as u64)?;
        Ok(Self {
            work_secs: work * 60,
            break_secs: brk * 60,
        })
    }

    /// Second-granular durations, mostly useful for short sessions in tests.
    pub fn from_seconds(work_secs: u32, break_secs: u32) -> Result<Self, ConfigError> {
        for secs in [work_secs, break_secs] {
            if secs == 0 || secs > MAX_DURATION_SECONDS {
                return Err(ConfigError::OutOfRange { value: secs as u64 });
            }
        }
        Ok(Self {
            work_secs,
            break_secs,
        })
    }

    pub fn work_secs(&self) -> u32 {
        self.work_secs
    }

    pub fn break_secs(&self) -> u32 {
        self.break_secs
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_secs.div_ceil(60)
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_secs.div_ceil(60)
    }
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            work_secs: DEFAULT_WORK_MINUTES * 60,
            break_secs: DEFAULT_BREAK_MINUTES * 60,
        }
    }
}

/// On-disk settings. Missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub volume: f32,
    pub sound: Option<PathBuf>,
    pub alarm_command: Option<String>,
    pub language: Locale,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            volume: DEFAULT_VOLUME,
            sound: None,
            alarm_command: None,
            language: Locale::En,
            theme: Theme::Dark,
        }
    }
}

impl Config {
    pub fn timer_configuration(&self) -> Result<TimerConfiguration, ConfigError> {
        TimerConfiguration::from_minutes(self.work_minutes, self.break_minutes)
    }

    /// Replace any out-of-range value with its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = Config::default();
        if let Err(e) = check_minutes(self.work_minutes as u64) {
            tracing::warn!(error = %e, "invalid work_minutes in config, using default");
            self.work_minutes = defaults.work_minutes;
        }
        if let Err(e) = check_minutes(self.break_minutes as u64) {
            tracing::warn!(error = %e, "invalid break_minutes in config, using default");
            self.break_minutes = defaults.break_minutes;
        }
        if let Err(e) = check_volume(self.volume) {
            tracing::warn!(error = %e, "invalid volume in config, using default");
            self.volume = defaults.volume;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pomofocus") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pomofocus_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<Config, ConfigError> {
        let bytes = fs::read(&self.path)?;
        let cfg = serde_json::from_slice::<Config>(&bytes)?;
        Ok(cfg.sanitized())
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not load config, using defaults"
                );
                Config::default()
            }
        }
    }
}
