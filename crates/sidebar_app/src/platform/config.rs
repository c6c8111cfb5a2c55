//! Application configuration loaded from a RON file.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command-line flags are applied on top by [`AppConfig::apply_overrides`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use sidebar_engine::EngineSettings;
use sidebar_logging::LogDestination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ws_url: String,
    pub api_base_url: String,
    pub reconnect_delay_ms: u64,
    pub feed_watchdog_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_target: LogTarget,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            ws_url: engine.ws_url,
            api_base_url: engine.api_base_url,
            reconnect_delay_ms: millis(engine.reconnect_delay),
            feed_watchdog_ms: millis(engine.feed_watchdog),
            connect_timeout_ms: millis(engine.connect_timeout),
            request_timeout_ms: millis(engine.request_timeout),
            log_target: LogTarget::Terminal,
            log_level: "info".to_string(),
            log_file: PathBuf::from("./sidebar.log"),
        }
    }
}

/// Values given on the command line; `None` keeps the file's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub ws_url: Option<String>,
    pub api_base_url: Option<String>,
    pub log_target: Option<LogTarget>,
    pub log_level: Option<String>,
}

/// Where the configuration came from; logged once the logger is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => f.write_str("built-in defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl AppConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let Some(path) = path else {
            return Ok((Self::default(), ConfigSource::Defaults));
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = ron::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok((config, ConfigSource::File(path.to_path_buf())))
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(ws_url) = overrides.ws_url {
            self.ws_url = ws_url;
        }
        if let Some(api_base_url) = overrides.api_base_url {
            self.api_base_url = api_base_url;
        }
        if let Some(target) = overrides.log_target {
            self.log_target = target;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .with_context(|| format!("unknown log level {:?}", self.log_level))
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            ws_url: self.ws_url.clone(),
            api_base_url: self.api_base_url.clone(),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            feed_watchdog: Duration::from_millis(self.feed_watchdog_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
