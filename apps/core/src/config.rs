use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::selection::AdvancePolicy;

const APP_DIR_NAME: &str = "rush";
const CONFIG_FILE_NAME: &str = "config.toml";
const HISTORY_FILE_NAME: &str = "rushHistory.txt";

/// Hard ceiling on the number of remembered commands.
pub const MAX_HISTORY_LIMIT: usize = 25;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to write config '{path}': {message}")]
    Write { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history_path: PathBuf,
    pub history_limit: usize,
    pub commands_path: Option<PathBuf>,
    pub advance_policy: AdvancePolicy,
    pub verbose: bool,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            history_path: base.join(HISTORY_FILE_NAME),
            history_limit: MAX_HISTORY_LIMIT,
            commands_path: None,
            advance_policy: AdvancePolicy::default(),
            verbose: false,
            config_path: base.join(CONFIG_FILE_NAME),
        }
    }
}

/// Per-user directory for config, history and logs.
///
/// Falls back to the temp dir when the platform has no data dir (CI containers).
pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.history_limit == 0 || cfg.history_limit > MAX_HISTORY_LIMIT {
        return Err(format!(
            "history_limit must be between 1 and {MAX_HISTORY_LIMIT}"
        ));
    }

    if cfg.history_path.as_os_str().is_empty() {
        return Err("history_path is required".into());
    }

    if cfg
        .commands_path
        .as_ref()
        .is_some_and(|path| path.as_os_str().is_empty())
    {
        return Err("commands_path must not be empty when set".into());
    }

    Ok(())
}

/// Load config from `path`, or from the default location when `None`.
///
/// A missing file yields defaults; an unreadable or malformed one is an error.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let mut cfg = match std::fs::read_to_string(&config_path) {
        Ok(raw) => toml::from_str::<Config>(&raw).map_err(|source| ConfigError::Parse {
            path: config_path.clone(),
            source,
        })?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no config at {}, using defaults", config_path.display());
            Config::default()
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path,
                source,
            })
        }
    };

    cfg.config_path = config_path;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    let write_error = |message: String| ConfigError::Write {
        path: cfg.config_path.clone(),
        message,
    };

    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }
    let encoded = toml::to_string_pretty(cfg).map_err(|e| write_error(e.to_string()))?;
    std::fs::write(&cfg.config_path, encoded).map_err(|e| write_error(e.to_string()))?;
    log::info!("wrote config to {}", cfg.config_path.display());
    Ok(())
}
