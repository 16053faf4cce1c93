//! Batch manifest - a row-oriented report built from a CSV template
//!
//! The template owns rows 1..=10 (a fixed header this crate never touches);
//! data rows start at row 11. Cell addressing is 1-based in both axes to
//! match the template's spreadsheet heritage. Workers publish their rows
//! into a `DashMap` keyed by absolute row number (disjoint keys, so writes
//! never contend on the same cell), and the batch owner drains the map into
//! the manifest after the fanout barrier and saves it exactly once.

use crate::common::MANIFEST_HEADER_ROWS;
use anyhow::{Context, Result};
use dashmap::DashMap;
use std::path::Path;

/// One report row describing one item's processing outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub sequence: u32,
    pub display_name: String,
    pub date: String,
    pub reference_name: String,
}

/// Concurrent staging area for rows, keyed by absolute row number.
pub type RowMap = DashMap<u32, ManifestRow>;

/// Absolute manifest row for the item at `index` of the batch list.
pub fn data_row(index: usize) -> u32 {
    index as u32 + MANIFEST_HEADER_ROWS + 1
}

pub struct Manifest {
    rows: Vec<Vec<String>>,
}

impl Manifest {
    /// Load a fresh copy of the template. The template file itself is never
    /// mutated; every batch starts from its own copy.
    pub fn load_template(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open manifest template {:?}", path))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("failed to parse manifest template {:?}", path))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    /// Set one cell, growing the sheet as needed. `row` and `col` are 1-based.
    pub fn set_cell(&mut self, row: u32, col: u32, value: impl Into<String>) {
        let row = row as usize - 1;
        let col = col as usize - 1;
        if self.rows.len() <= row {
            self.rows.resize(row + 1, Vec::new());
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.into();
    }

    /// Read one cell back. 1-based, `None` outside the populated area.
    pub fn cell(&self, row: u32, col: u32) -> Option<&str> {
        self.rows
            .get(row as usize - 1)
            .and_then(|cells| cells.get(col as usize - 1))
            .map(String::as_str)
    }

    /// Apply a staged row to its six manifest columns.
    pub fn apply_row(&mut self, row: u32, data: &ManifestRow) {
        self.set_cell(row, 1, data.sequence.to_string());
        self.set_cell(row, 2, data.display_name.clone());
        self.set_cell(row, 3, data.display_name.clone());
        self.set_cell(row, 4, data.date.clone());
        self.set_cell(row, 5, data.reference_name.clone());
        self.set_cell(row, 6, "");
    }

    /// Persist the manifest. Called exactly once per batch, after all
    /// per-item work has completed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to create manifest {:?}", path))?;

        for row in &self.rows {
            if row.is_empty() {
                // A fully blank line would be skipped on re-read; keep the
                // row countable by emitting two empty fields.
                writer.write_record(["", ""])?;
            } else {
                writer.write_record(row)?;
            }
        }
        writer
            .flush()
            .with_context(|| format!("failed to write manifest {:?}", path))?;
        Ok(())
    }
}
