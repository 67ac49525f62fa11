//! Command-line plumbing shared by the binaries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{ConfigManager, Settings, ToolDefaults};
use crate::connection::{ConnectionManager, MongoSource};
use crate::helpers::redact_uri_password;
use crate::models::StatsSnapshot;
use crate::stats::{StatsCollector, physical_ram};

/// Where to connect and what to include.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// MongoDB host [default: localhost]
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// MongoDB port [default: 27017]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Full connection string; overrides host and port
    #[arg(long, env = "MONGODB_URI")]
    pub uri: Option<String>,

    /// Target database. All databases if omitted
    #[arg(short, long)]
    pub database: Option<String>,

    /// Include the `local` database (replication oplog)
    #[arg(long)]
    pub include_local: bool,

    /// Bytes to hold back from RAM headroom [default: total index size]
    #[arg(long, value_name = "BYTES")]
    pub reserved_margin: Option<u64>,

    /// Read defaults from this JSON file instead of the user config directory
    #[arg(long, value_name = "PATH", env = "MONGODB_TOOLS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Merge these flags with the config file.
    pub fn settings(&self) -> Result<Settings> {
        let defaults = match &self.config {
            Some(path) => ConfigManager::load_defaults_from(path)?,
            None => match ConfigManager::new() {
                Ok(manager) => manager.load_defaults()?,
                Err(err) => {
                    log::debug!("No config directory: {err:#}");
                    ToolDefaults::default()
                }
            },
        };
        Settings::resolve(self, defaults)
    }
}

/// Log to stderr at `warn` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

/// Connect with `settings` and run one statistics pass.
pub fn collect_snapshot(manager: &ConnectionManager, settings: &Settings) -> Result<StatsSnapshot> {
    let source = MongoSource::connect(manager, &settings.uri)?;

    let total_ram = if settings.is_local() {
        Some(physical_ram())
    } else {
        log::info!("{} is not local; skipping the RAM estimate", settings.host);
        None
    };

    let snapshot =
        StatsCollector::new(&source, settings.collect_options(total_ram)).collect().with_context(
            || format!("Failed to collect statistics from {}", redact_uri_password(&settings.uri)),
        )?;

    if !snapshot.skipped.is_empty() {
        log::warn!("{} database(s)/collection(s) skipped", snapshot.skipped.len());
    }

    Ok(snapshot)
}
