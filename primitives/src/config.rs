use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub use toml::de::Error as TomlError;

/// The configuration bundled with the crate. Deployments can override it
/// with their own file through [`configuration`].
pub static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::try_toml(include_str!("../../docs/config/default.toml"))
        .expect("Failed to parse default.toml config file")
});

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// First hour (inclusive) of the local-time window in which
    /// core-hours-only campaigns are not served.
    #[serde(default)]
    pub prohibited_hour_start: u32,
    /// Last hour (inclusive) of that window.
    #[serde(default = "default_prohibited_hour_end")]
    pub prohibited_hour_end: u32,
    /// Applied to non-fixed eCPMs when the request country is unresolved.
    pub unknown_country_multiplier: f64,
    /// Pricing table keyed by ISO 3166-1 alpha-2 code. The multiplier
    /// values are data, supplied by the configuration file.
    #[serde(rename = "country")]
    pub countries: HashMap<String, CountryInfo>,
}

fn default_prohibited_hour_end() -> u32 {
    5
}

impl Config {
    /// Utility method that will deserialize a Toml file content into a [`Config`].
    ///
    /// Instead of relying on the `toml` crate directly, use this method instead.
    pub fn try_toml(toml: &str) -> Result<Self, TomlError> {
        toml::from_str(toml)
    }

    /// Pricing entry for a country. Unknown codes are simply absent.
    pub fn country(&self, code: &str) -> Option<&CountryInfo> {
        self.countries.get(code)
    }

    pub fn is_prohibited_hour(&self, hour: u32) -> bool {
        (self.prohibited_hour_start..=self.prohibited_hour_end).contains(&hour)
    }
}

/// Per-country eCPM multipliers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CountryInfo {
    pub name: String,
    /// Current multiplier.
    pub cpm_multiplier: f64,
    /// Multiplier kept for campaigns started before the 2019-03-07 pricing
    /// change.
    pub country_multiplier: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Toml parsing: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("File reading: {0}")]
    InvalidFile(#[from] std::io::Error),
}

/// If no `config_file` path is provided it will load the bundled defaults.
/// If `config_file` path is provided it will try to read and parse the file
/// in Toml format.
pub fn configuration(config_file: Option<&str>) -> Result<Config, ConfigError> {
    match config_file {
        Some(config_file) => {
            let content = std::fs::read_to_string(config_file)?;

            Ok(Config::try_toml(&content)?)
        }
        None => Ok(DEFAULT_CONFIG.clone()),
    }
}
