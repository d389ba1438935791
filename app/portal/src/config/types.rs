//! Configuration types and loading functions.
//!
//! Contains the root `PortalConfig` struct and configuration file loading utilities.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::constants::{config as files, notification};

/// Root configuration structure for termappchooser.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PortalConfig {
    /// Launch notification settings.
    pub notifications: NotificationsConfig,

    /// Decision policy for `ChooseApplication`.
    pub chooser: ChooserConfig,

    /// Settings for starting handler applications.
    pub launch: LaunchConfig,
}

/// Desktop notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationsConfig {
    /// Whether a notification is sent after every successful launch.
    /// Default: true
    pub enabled: bool,

    /// Application name the notifications are sent as.
    /// Default: "XDG Portal"
    pub app_name: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: notification::DEFAULT_APP_NAME.to_string(),
        }
    }
}

/// Which policy decides `ChooseApplication` calls.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ChooserPolicyKind {
    /// Always pick the first candidate.
    #[default]
    First,
    /// Pick the caller's `last_choice` when it is still a candidate, else the first.
    LastChoice,
}

/// Chooser configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ChooserConfig {
    /// Decision policy: "first" or "lastChoice".
    pub policy: ChooserPolicyKind,
}

/// Launch configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LaunchConfig {
    /// Command prefix used to run `Terminal=true` applications,
    /// e.g. `["foot", "-e"]`.
    /// When empty, `$TERMINAL -e` is used, falling back to `xterm -e`.
    pub terminal: Vec<String>,
}

impl LaunchConfig {
    /// Returns the terminal command prefix, resolving the fallbacks.
    #[must_use]
    pub fn terminal_command(&self) -> Vec<String> {
        if !self.terminal.is_empty() {
            return self.terminal.clone();
        }

        let terminal = std::env::var("TERMINAL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "xterm".to_string());
        vec![terminal, "-e".to_string()]
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/termappchooser/config.jsonc or config.json"
    )]
    NotFound,
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &[files::CONFIG_FILE, files::CONFIG_FILE_ALT];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/termappchooser/config.jsonc` or `config.json`
/// 2. `~/.config/termappchooser/config.jsonc` or `config.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(xdg_config) = std::env::var_os("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
        let dir = PathBuf::from(xdg_config).join(files::CONFIG_DIR);
        for filename in CONFIG_FILE_NAMES {
            paths.push(dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let dir = home.join(".config").join(files::CONFIG_DIR);
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            // XDG_CONFIG_HOME is usually ~/.config already
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    paths
}

/// Loads the configuration from a specific file path.
///
/// The file supports JSONC (JSON with `//` and `/* */` comments).
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::IoError` if it cannot be read and
/// `ConfigError::ParseError` if it is not valid JSON.
pub fn load_config_from_path(path: &Path) -> Result<PortalConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists, or the
/// error from [`load_config_from_path`] for the first file that does.
pub fn load_config() -> Result<(PortalConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path).map(|config| (config, path));
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration the CLI was pointed at.
///
/// An explicit `path` must exist and parse. Without one the search locations
/// are tried and defaults are used when nothing usable is found.
///
/// # Errors
///
/// Returns `ConfigError::IoError` if an explicit `path` is missing or
/// unreadable and `ConfigError::ParseError` if it is not valid JSON.
pub fn load(path: Option<&Path>) -> Result<PortalConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(load_or_default());
    };

    let config = load_config_from_path(path).map_err(|err| match err {
        ConfigError::NotFound => ConfigError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )),
        other => other,
    })?;

    tracing::info!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Loads the configuration from the search locations, falling back to
/// defaults on any error.
///
/// A missing file is expected and logged at debug level; a broken one is
/// logged as a warning. The service must come up either way.
#[must_use]
pub fn load_or_default() -> PortalConfig { or_default(load_config()) }

fn or_default(loaded: Result<(PortalConfig, PathBuf), ConfigError>) -> PortalConfig {
    match loaded {
        Ok((config, path)) => {
            tracing::info!("loaded configuration from {}", path.display());
            config
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            PortalConfig::default()
        }
        Err(err) => {
            tracing::warn!("{err}; using defaults");
            PortalConfig::default()
        }
    }
}
