use anyhow::Result;
use photo_batcher::{config::BatcherConfig, setup, workflow::partition};

fn main() -> Result<()> {
    setup::initialize_logger();
    let config = BatcherConfig::from_env()?;
    setup::initialize_folder(&config)?;
    partition::run(&config)
}
