//! Partitioner - the top-level driver
//!
//! Enumerates the corpus in lexicographic order (the order every downstream
//! index depends on), rebuilds the metadata store fresh, groups items by
//! their resolved year, chunks each year group into batch-size windows, and
//! drives the batch pipeline sequentially. Per-batch parallelism lives
//! inside the pipeline, not here.

use crate::config::BatcherConfig;
use crate::resolver;
use crate::store::{MetadataRecord, MetadataStore};
use crate::workflow::{Item, batch::run_batch};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{error, info};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

pub fn run(config: &BatcherConfig) -> Result<()> {
    let items = enumerate_items(&config.image_directory_folder)?;
    info!("Found {} images", items.len());

    // Always rebuilt fresh; a previously persisted store is never reused.
    let store = MetadataStore::rebuild(&config.image_directory_folder, &config.metadata_db_path)?;

    let items_by_year = group_by_year(items, &store, &config.default_date);

    for (year, year_items) in &items_by_year {
        let batch_count = year_items.len().div_ceil(config.batch_size);
        let progress = ProgressBar::new(batch_count as u64);
        for (window_index, window) in year_items.chunks(config.batch_size).enumerate() {
            let batch_number = window_index + 1;
            if let Err(err) = run_batch(window, year, batch_number, &store, config) {
                error!("Batch {} for {} failed: {err:#}", batch_number, year);
            }
            progress.inc(1);
        }
        progress.finish_and_clear();
    }

    Ok(())
}

/// Enumerate eligible `*.jpg` items at the top level of `image_dir`, sorted
/// lexicographically by file name.
pub fn enumerate_items(image_dir: &Path) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    for entry in WalkDir::new(image_dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("failed to read image directory {:?}", image_dir))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(stem) = file_name.strip_suffix(".jpg") else {
            continue;
        };
        items.push(Item {
            file_name: file_name.to_string(),
            stem: stem.to_string(),
            path: entry.path().to_path_buf(),
        });
    }
    items.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(items)
}

/// Bucket items by the year component of their resolved date, preserving
/// the input order within each group.
pub fn group_by_year(
    items: Vec<Item>,
    store: &MetadataStore,
    default_date: &str,
) -> BTreeMap<String, Vec<Item>> {
    let empty = MetadataRecord::new();
    let mut items_by_year: BTreeMap<String, Vec<Item>> = BTreeMap::new();
    for item in items {
        let record = store.get(&item.stem).unwrap_or(&empty);
        let bucket = resolver::resolve(record, default_date);
        let year = bucket.rsplit('/').next().unwrap_or(&bucket).to_string();
        items_by_year.entry(year).or_default().push(item);
    }
    items_by_year
}
