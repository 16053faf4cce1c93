//! Metadata store - per-item tag records persisted in a redb table
//!
//! Each image may carry a sibling JSON document holding its tag map. The
//! store is rebuilt fresh on every run: documents are scanned, normalized,
//! written into the `metadata` table, and kept in memory for processing.
//! The table is read-only once processing starts.

use anyhow::{Context, Result};
use log::{error, info, warn};
use redb::{Database, ReadableTable, TableDefinition};
use serde_json::Value;
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};
use walkdir::WalkDir;

/// Tag name to string value, as found in an item's metadata document.
pub type MetadataRecord = BTreeMap<String, String>;

const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

pub struct MetadataStore {
    records: HashMap<String, MetadataRecord>,
}

impl MetadataStore {
    /// Rebuild the store from the `*.json` documents next to the images,
    /// overwriting any previously persisted table. Unreadable or malformed
    /// documents are logged and skipped, never fatal.
    pub fn rebuild(image_dir: &Path, db_path: &Path) -> Result<Self> {
        if db_path.exists() {
            fs::remove_file(db_path)
                .with_context(|| format!("failed to remove stale metadata db {:?}", db_path))?;
        }
        let db = Database::create(db_path)
            .with_context(|| format!("failed to create metadata db {:?}", db_path))?;

        let mut records = HashMap::new();
        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(METADATA_TABLE)?;
            for entry in WalkDir::new(image_dir).min_depth(1).max_depth(1) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        error!("failed to read directory entry: {err}");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(name) = entry.file_name().to_str() else {
                    continue;
                };
                let Some(stem) = name.strip_suffix(".json") else {
                    continue;
                };

                match read_record(entry.path()) {
                    Ok(Some(record)) => {
                        let encoded = serde_json::to_vec(&record)?;
                        table.insert(stem, encoded.as_slice())?;
                        records.insert(stem.to_string(), record);
                    }
                    Ok(None) => {
                        warn!("Unexpected metadata format in file: {:?}", entry.path());
                    }
                    Err(err) => {
                        error!("Error reading JSON file {:?}: {err:#}", entry.path());
                    }
                }
            }
        }
        txn.commit()?;

        info!("Created metadata store with {} records", records.len());
        Ok(Self { records })
    }

    /// Read a previously persisted store back from disk. Entries that fail
    /// to decode are logged and skipped.
    pub fn load(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)
            .with_context(|| format!("failed to open metadata db {:?}", db_path))?;
        let txn = db.begin_read()?;
        let table = txn.open_table(METADATA_TABLE)?;

        let mut records = HashMap::new();
        for item in table.iter()? {
            let (key, value) = item?;
            match serde_json::from_slice::<MetadataRecord>(value.value()) {
                Ok(record) => {
                    records.insert(key.value().to_string(), record);
                }
                Err(err) => {
                    error!("Error reading record {} from metadata db: {err}", key.value());
                }
            }
        }

        info!("Loaded metadata store with {} records", records.len());
        Ok(Self { records })
    }

    pub fn get(&self, stem: &str) -> Option<&MetadataRecord> {
        self.records.get(stem)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse one metadata document. A top-level array collapses to its first
/// element; anything that is not an object yields `None`.
fn read_record(path: &Path) -> Result<Option<MetadataRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read metadata document {:?}", path))?;
    let mut value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse metadata document {:?}", path))?;

    if let Value::Array(entries) = value {
        value = entries.into_iter().next().unwrap_or(Value::Null);
    }

    match value {
        Value::Object(map) => {
            let record = map
                .into_iter()
                .map(|(tag, value)| match value {
                    Value::String(text) => (tag, text),
                    other => (tag, other.to_string()),
                })
                .collect();
            Ok(Some(record))
        }
        _ => Ok(None),
    }
}
