use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding titles.txt, features.csv and metadata.jsonl
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Neighbors fetched per liked title before merging
    #[serde(default = "default_fan_out")]
    pub fan_out: usize,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_fan_out() -> usize {
    pipeline::DEFAULT_FAN_OUT
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
