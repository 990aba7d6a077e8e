//! Server configuration
//!
//! Layered, lowest precedence first: built-in defaults, TOML file,
//! environment (`WORKDAY_DRAW_*`, `.env` honoured), command-line flags.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;

const APP_DIR: &str = "workday-draw";
const ENV_PREFIX: &str = "WORKDAY_DRAW_";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// Uploads older than this are removed by the sweeper
    pub retention_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5280,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            retention_secs: 600,
            sweep_interval_secs: 60,
        }
    }
}

impl StorageConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn default_upload_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR).join("uploads"))
        .unwrap_or_else(|| PathBuf::from("uploads"))
}

/// Config file used when `--config` is not given, if it exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

impl Config {
    /// Build the effective config for a run
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `WORKDAY_DRAW_*` overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid {}PORT: {}", ENV_PREFIX, port))?;
        }
        if let Some(dir) = var("UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }
        if let Some(bytes) = var("MAX_UPLOAD_BYTES") {
            self.server.max_upload_bytes = bytes
                .parse()
                .with_context(|| format!("Invalid {}MAX_UPLOAD_BYTES: {}", ENV_PREFIX, bytes))?;
        }
        if let Some(secs) = var("RETENTION_SECS") {
            self.storage.retention_secs = secs
                .parse()
                .with_context(|| format!("Invalid {}RETENTION_SECS: {}", ENV_PREFIX, secs))?;
        }
        if let Some(secs) = var("SWEEP_INTERVAL_SECS") {
            self.storage.sweep_interval_secs = secs.parse().with_context(|| {
                format!("Invalid {}SWEEP_INTERVAL_SECS: {}", ENV_PREFIX, secs)
            })?;
        }

        Ok(())
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(dir) = &cli.upload_dir {
            self.storage.upload_dir = dir.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.max_upload_bytes == 0 {
            bail!("server.max_upload_bytes must be non-zero");
        }
        if self.storage.retention_secs == 0 {
            bail!("storage.retention_secs must be non-zero");
        }
        if self.storage.sweep_interval_secs == 0 {
            bail!("storage.sweep_interval_secs must be non-zero");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
