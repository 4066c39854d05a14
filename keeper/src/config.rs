//! Keeper configuration

use anyhow::{Context, Result};
use launchpad_core::LaunchpadConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON scenario of instructions to replay
    pub scenario_path: String,

    /// JSON-lines event dump; events are only logged when unset
    #[serde(default)]
    pub events_out: Option<String>,

    /// Tick interval in milliseconds
    pub poll_interval_ms: u64,

    /// Scenario steps applied per tick
    pub actions_per_tick: usize,

    /// Maximum graduation attempts per tick
    pub max_graduations_per_tick: usize,

    /// Stop after this many ticks even if work remains
    #[serde(default)]
    pub max_ticks: Option<u64>,

    /// Make the first N pool creations fail (exercises the retry path)
    #[serde(default)]
    pub pool_fail_first_attempts: u32,

    /// Engine parameters
    #[serde(default)]
    pub launchpad: LaunchpadConfig,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("KEEPER_CONFIG")
            .unwrap_or_else(|_| "keeper-config.toml".to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let config_str = std::fs::read_to_string(expanded.as_ref())
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config TOML")?;

        config
            .launchpad
            .validate()
            .context("Invalid launchpad parameters")?;

        Ok(config)
    }

    /// Local replay defaults
    pub fn default_local() -> Self {
        Self {
            scenario_path: "scenario.json".to_string(),
            events_out: None,
            poll_interval_ms: 100,
            actions_per_tick: 10,
            max_graduations_per_tick: 5,
            max_ticks: None,
            pool_fail_first_attempts: 0,
            launchpad: LaunchpadConfig::default(),
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_local();
        let toml_str = toml::to_string_pretty(&config)
            .context("Failed to serialize config")?;

        std::fs::write(path, toml_str)
            .context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }
}
