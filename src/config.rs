use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SyncError};
use crate::store::timeline::DEFAULT_MAX_ENTRIES;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved settings for one invocation. Built once in main and passed to
/// every component that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_dir: PathBuf,
    pub max_timeline_entries: usize,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_timeline_entries: DEFAULT_MAX_ENTRIES,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// Values given on the command line or through the environment. They win
/// over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub max_timeline_entries: Option<usize>,
}

/// On-disk config (~/.config/subsync/config.toml or --config).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    output_dir: Option<PathBuf>,
    max_timeline_entries: Option<usize>,
    http_timeout: Option<String>,
}

impl Config {
    /// Layer defaults, the config file and overrides. An explicit
    /// `config_path` must exist; the default location is optional.
    pub fn resolve(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => Some(read_file_config(path)?.ok_or_else(|| {
                SyncError::io(path, io::Error::new(io::ErrorKind::NotFound, "config file not found"))
            })?),
            None => match default_config_path() {
                Some(path) => read_file_config(&path)?,
                None => None,
            },
        };

        let mut config = Config::default();

        if let Some(file) = file {
            if let Some(dir) = file.output_dir {
                config.output_dir = dir;
            }
            if let Some(max) = file.max_timeline_entries {
                config.max_timeline_entries = max;
            }
            if let Some(raw) = file.http_timeout {
                config.http_timeout = humantime::parse_duration(&raw).map_err(|e| {
                    SyncError::InvalidSetting {
                        key: "http_timeout",
                        reason: format!("'{raw}': {e}"),
                    }
                })?;
            }
        }

        if let Some(dir) = overrides.output_dir {
            config.output_dir = dir;
        }
        if let Some(max) = overrides.max_timeline_entries {
            config.max_timeline_entries = max;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_timeline_entries == 0 {
            return Err(SyncError::InvalidSetting {
                key: "max_timeline_entries",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(SyncError::InvalidSetting {
                key: "http_timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "subsync").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_file_config(path: &Path) -> Result<Option<FileConfig>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SyncError::io(path, e)),
    };

    let parsed = toml::from_str(&raw).map_err(|e| SyncError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(Some(parsed))
}
