use serde::Deserialize;

use crate::models::CharMapping;
use crate::output::OutputFormat;
use crate::pkce::verifier::DEFAULT_LENGTH;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Requested verifier length; out-of-range values are clamped.
    #[serde(default = "default_length")]
    pub length: i64,
    #[serde(default)]
    pub mapping: CharMapping,
    #[serde(default)]
    pub format: OutputFormat,
    /// Filter directive used when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_length() -> i64 { DEFAULT_LENGTH }
fn default_log_level() -> String { "info".into() }

impl Default for Config {
    fn default() -> Self {
        Self {
            length: default_length(),
            mapping: CharMapping::default(),
            format: OutputFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        Ok(cfg)
    }
}
