//! Transformer - the per-item unit of work
//!
//! Looks up the item's metadata (absence is tolerated), resolves its date
//! bucket, writes the resized copy into the batch directory, and publishes
//! the manifest row for the item's position. Any failure is contained to
//! this one item; the caller logs it and carries on.

use crate::config::BatcherConfig;
use crate::manifest::{ManifestRow, RowMap, data_row};
use crate::operations::resize::resize_to_fit;
use crate::resolver;
use crate::store::{MetadataRecord, MetadataStore};
use crate::workflow::Item;
use anyhow::{Context, Result};
use log::warn;
use std::path::Path;

/// Process one item of a batch. `index` is the item's position in the
/// pre-sorted batch list; it alone determines the manifest row.
pub fn process_item(
    item: &Item,
    batch_dir: &Path,
    index: usize,
    store: &MetadataStore,
    rows: &RowMap,
    config: &BatcherConfig,
) -> Result<()> {
    let empty = MetadataRecord::new();
    let record = match store.get(&item.stem) {
        Some(record) => record,
        None => {
            warn!("No metadata found for image: {}", item.file_name);
            &empty
        }
    };

    let date = resolver::resolve(record, &config.default_date);

    let resized_path = batch_dir.join(&item.file_name);
    resize_to_fit(&item.path, &resized_path, config.max_dimension)
        .with_context(|| format!("failed to resize image {}", item.file_name))?;

    rows.insert(
        data_row(index),
        ManifestRow {
            sequence: index as u32 + 1,
            display_name: item.file_name.clone(),
            date,
            reference_name: item.file_name.clone(),
        },
    );

    Ok(())
}
