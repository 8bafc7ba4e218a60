use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{BountyError, Result};

/// Hourly payout rate applied when no config or env override is set.
pub const DEFAULT_HOURLY_RATE: f64 = 50.0;

#[derive(Deserialize, Default)]
pub struct Config {
    pub api_token: Option<String>,
    pub hourly_rate: Option<f64>,
    pub airtable_key: Option<String>,
    pub airtable_base: Option<String>,
    pub airtable_table: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| BountyError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| BountyError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "bounty")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(BountyError::NoConfigDir)
    }

    /// Get the GitHub token with env var taking precedence over config file
    pub fn api_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            return Ok(token);
        }

        self.api_token.clone().ok_or(BountyError::MissingToken)
    }

    /// Hourly rate: env override, then config file, then the default.
    pub fn hourly_rate(&self) -> f64 {
        std::env::var("HOURLY_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(self.hourly_rate)
            .unwrap_or(DEFAULT_HOURLY_RATE)
    }

    pub fn airtable_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("AIRTABLE_API_KEY") {
            return Ok(key);
        }

        self.airtable_key.clone().ok_or(BountyError::MissingAirtableKey)
    }

    pub fn airtable_base(&self) -> Result<String> {
        resolve("AIRTABLE_BASE", self.airtable_base.clone())
    }

    pub fn airtable_table(&self) -> Result<String> {
        resolve("AIRTABLE_TABLE", self.airtable_table.clone())
    }
}

fn resolve(env_name: &'static str, fallback: Option<String>) -> Result<String> {
    std::env::var(env_name)
        .ok()
        .or(fallback)
        .ok_or(BountyError::MissingEnv(env_name))
}
