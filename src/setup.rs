//! Setup/initialization module - handles application startup tasks
//!
//! Includes:
//! - Logger initialization
//! - Output/metadata folder structure initialization

use crate::config::BatcherConfig;
use anyhow::{Context, Result};
use env_logger::Builder;
use std::{fs, io::Write};

/// Initialize the logger with a compact single-line format.
pub fn initialize_logger() {
    Builder::new()
        .format(|buf, record| {
            let ts = buf.timestamp();
            writeln!(
                buf,
                "{} {:<5} {} {}",
                ts,
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Create the folder structure required before any processing starts.
pub fn initialize_folder(config: &BatcherConfig) -> Result<()> {
    fs::create_dir_all(&config.output_directory_folder).with_context(|| {
        format!(
            "failed to create output directory {:?}",
            config.output_directory_folder
        )
    })?;

    if let Some(parent) = config.metadata_db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create metadata directory {:?}", parent))?;
    }

    Ok(())
}
