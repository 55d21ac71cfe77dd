//! Configuration loading

use anyhow::{Context, Result};
use ask_mirror::DEFAULT_UPSTREAM_URL;
use config::{Environment, File, FileFormat, Map};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the store inside the db directory
pub const STORE_FILE_NAME: &str = "ask.db";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root directory for the mirror and the store; `~` expands to `$HOME`
    #[serde(default = "default_repository")]
    pub repository: PathBuf,
    /// Mirror subdirectory of `repository`
    #[serde(default = "default_data")]
    pub data: String,
    /// Store subdirectory of `repository`
    #[serde(default = "default_db")]
    pub db: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on graceful shutdown once a signal arrives
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Upstream data repository
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub url: String,
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            git_binary: default_git_binary(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

// Default value functions
fn default_repository() -> PathBuf {
    PathBuf::from("~/.ask")
}

fn default_data() -> String {
    "data".to_string()
}

fn default_db() -> String {
    "db".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_git_binary() -> String {
    "git".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration: defaults, then the TOML file at `path` if it
    /// exists, then `ASK_*` environment variables (`__` separates nesting,
    /// e.g. `ASK_SERVER__PORT`)
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Config::load`], reading variables from `env` instead of the
    /// process environment when given
    pub fn load_with_env(path: &Path, env: Option<Map<String, String>>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("ASK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        let mut config: Config = settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.repository = expand_home(&config.repository);
        Ok(config)
    }

    /// Directory holding the store file
    pub fn db_dir(&self) -> PathBuf {
        self.repository.join(&self.db)
    }

    pub fn store_path(&self) -> PathBuf {
        self.db_dir().join(STORE_FILE_NAME)
    }
}

/// Expand a leading `~` to `$HOME`
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}
