//! Handles settings for the application. Configuration is read from
//! `settings.toml` (or the file given with `--config`) and can be overridden
//! with `DAILY_APPS__<SECTION>__<KEY>` environment variables.
//!
//! See `settings.example.toml` for the configuration.
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "daily_apps", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub store_timeout_ms: Option<u64>,
}

impl Server {
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(engine::DEFAULT_STORE_TIMEOUT)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        Self::from_builder(
            Config::builder().add_source(
                File::with_name(args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH))
                    .required(args.config.is_some()),
            ),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("DAILY_APPS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
