use anyhow::{Context, Result};
use dotenv::dotenv;
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime configuration, read once at startup from the environment
/// (optionally seeded from a `.env` file). Field names map directly to the
/// upper-cased environment variable names.
#[derive(Debug, Clone, Deserialize)]
pub struct BatcherConfig {
    pub image_directory_folder: PathBuf,
    pub output_directory_folder: PathBuf,
    pub template_path: PathBuf,
    #[serde(default = "default_metadata_db_path")]
    pub metadata_db_path: PathBuf,
    #[serde(default = "default_date")]
    pub default_date: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_sub_batch_size")]
    pub sub_batch_size: usize,
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

fn default_metadata_db_path() -> PathBuf {
    PathBuf::from("meta/metadata.redb")
}

fn default_date() -> String {
    "08/2024".to_string()
}

fn default_batch_size() -> usize {
    750
}

fn default_sub_batch_size() -> usize {
    150
}

fn default_max_dimension() -> u32 {
    360
}

impl BatcherConfig {
    /// Load configuration from the environment. Missing required variables
    /// are fatal; processing must not start without them.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let config = envy::from_env::<BatcherConfig>().context(
            "One or more environment variables are missing. Please check the .env file.",
        )?;
        Ok(config)
    }
}
