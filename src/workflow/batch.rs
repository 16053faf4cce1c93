//! BatchPipeline - fan the transformer out over one batch
//!
//! Creates the batch directory, runs every item on the worker pool, persists
//! the manifest once after the fanout barrier, then re-chunks the original
//! item list into sub-batch directories of already-resized copies. A failed
//! item never aborts the batch; it is simply absent from the manifest and
//! from its sub-batch.

use crate::common::WORKER_RAYON_POOL;
use crate::config::BatcherConfig;
use crate::manifest::{Manifest, RowMap};
use crate::store::MetadataStore;
use crate::workflow::{Item, transform::process_item};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{error, info, warn};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use std::fs;

pub fn run_batch(
    items: &[Item],
    year: &str,
    batch_number: usize,
    store: &MetadataStore,
    config: &BatcherConfig,
) -> Result<()> {
    let batch_dir = config
        .output_directory_folder
        .join(format!("{}_batch_{}", year, batch_number));
    fs::create_dir_all(&batch_dir)
        .with_context(|| format!("failed to create batch directory {:?}", batch_dir))?;

    // Fresh template copy per batch; the template source is never mutated.
    let mut manifest = Manifest::load_template(&config.template_path)?;
    let rows = RowMap::new();

    let progress = ProgressBar::new(items.len() as u64);
    let failures = WORKER_RAYON_POOL.install(|| {
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| {
                let result = process_item(item, &batch_dir, index, store, &rows, config);
                progress.inc(1);
                match result {
                    Ok(()) => 0usize,
                    Err(err) => {
                        error!("Error processing image {}: {err:#}", item.file_name);
                        1
                    }
                }
            })
            .sum::<usize>()
    });
    progress.finish_and_clear();

    if failures > 0 {
        warn!(
            "{} of {} images failed in batch {} for {}",
            failures,
            items.len(),
            batch_number,
            year
        );
    }

    // All workers have joined; drain the staged rows and persist once.
    for (row, data) in rows.into_iter() {
        manifest.apply_row(row, &data);
    }
    let manifest_path = batch_dir.join(format!("diversity_photos_batch_{}.csv", batch_number));
    manifest.save(&manifest_path)?;

    // Sub-batches follow the original item order, successes or not; an item
    // whose resized file is missing is skipped with a warning.
    for (window_index, sub_batch) in items.chunks(config.sub_batch_size).enumerate() {
        let sub_batch_dir = batch_dir.join(format!("sub_batch_{}", window_index + 1));
        fs::create_dir_all(&sub_batch_dir)
            .with_context(|| format!("failed to create sub-batch directory {:?}", sub_batch_dir))?;

        for item in sub_batch {
            let resized_path = batch_dir.join(&item.file_name);
            if !resized_path.exists() {
                warn!("Resized image not found: {:?}", resized_path);
                continue;
            }
            if let Err(err) = fs::copy(&resized_path, sub_batch_dir.join(&item.file_name)) {
                error!("Failed to copy {:?} into {:?}: {err}", resized_path, sub_batch_dir);
            }
        }
    }

    info!("Processed batch {} for {}", batch_number, year);
    Ok(())
}
