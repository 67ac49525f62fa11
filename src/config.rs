// Connection defaults from the optional config file, merged with command-line flags

use anyhow::{Context, Result};
use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::ConnectionArgs;
use crate::error::Error;
use crate::helpers::{build_uri, extract_host_from_uri, is_local_host, validate_mongodb_uri};
use crate::stats::CollectOptions;

const APP_NAME: &str = "mongodb-tools";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;

/// Locates the per-user config directory
#[derive(Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

/// Contents of `config.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolDefaults {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub uri: Option<String>,
    pub include_local: Option<bool>,
    pub reserved_margin: Option<u64>,
}

impl ConfigManager {
    const DEFAULTS_FILE: &'static str = "config.json";

    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the platform-specific config directory
    fn get_config_dir() -> Result<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME)).context("Could not determine config directory")
    }

    /// Get path to a specific config file
    fn file_path(&self, filename: &str) -> PathBuf {
        self.config_dir.join(filename)
    }

    /// Load data from a JSON file, `None` if it does not exist
    fn load_json<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        let path = self.file_path(filename);

        if !path.exists() {
            return Ok(None);
        }

        read_json(&path).map(Some)
    }

    /// Defaults from `config.json` in the config directory, empty if there is none.
    pub fn load_defaults(&self) -> Result<ToolDefaults> {
        Ok(self.load_json(Self::DEFAULTS_FILE)?.unwrap_or_default())
    }

    /// Defaults from an explicitly named file, which must exist.
    pub fn load_defaults_from(path: &Path) -> Result<ToolDefaults> {
        read_json(path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&data).with_context(|| format!("Failed to deserialize {}", path.display()))
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub uri: String,
    /// First host in `uri`, used to decide whether memory figures apply.
    pub host: String,
    pub database: Option<String>,
    pub include_local: bool,
    pub reserved_margin: Option<u64>,
}

impl Settings {
    /// Flags and environment win over the config file, which wins over built-in defaults.
    /// An explicit URI wins over host/port from the same or a lower layer.
    pub fn resolve(args: &ConnectionArgs, defaults: ToolDefaults) -> Result<Self> {
        let uri = match (&args.uri, &defaults.uri) {
            (Some(uri), _) => uri.clone(),
            (None, Some(uri)) if args.host.is_none() && args.port.is_none() => uri.clone(),
            _ => {
                let host = args.host.clone().or_else(|| defaults.host.clone());
                let port = args.port.or(defaults.port).unwrap_or(DEFAULT_PORT);
                build_uri(host.as_deref().unwrap_or(DEFAULT_HOST), port)
            }
        };

        validate_mongodb_uri(&uri).map_err(Error::Config)?;
        let host = extract_host_from_uri(&uri)
            .ok_or_else(|| Error::Config("connection URI has no host".into()))?;

        Ok(Self {
            uri,
            host,
            database: args.database.clone().filter(|name| !name.is_empty()),
            include_local: args.include_local || defaults.include_local.unwrap_or(false),
            reserved_margin: args.reserved_margin.or(defaults.reserved_margin),
        })
    }

    /// Memory figures come from this machine, so they only apply to a local server.
    pub fn is_local(&self) -> bool {
        is_local_host(&self.host)
    }

    pub fn collect_options(&self, total_ram: Option<u64>) -> CollectOptions {
        CollectOptions {
            database: self.database.clone(),
            include_local: self.include_local,
            total_ram,
            reserved_margin: self.reserved_margin,
        }
    }
}
