//! Date resolution - reduce a metadata record to a single `MM/YYYY` bucket
//!
//! Every date tag is tried against the accepted formats and all successful
//! parses are collected; the latest absolute date wins, regardless of which
//! tag produced it. Naive dates are pinned to UTC so they stay comparable
//! with offset-carrying ones. When nothing parses, the configured default
//! bucket is returned. Malformed values are never an error.

use crate::common::{DATE_FORMATS, DATE_TAGS};
use crate::store::MetadataRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;

/// Resolve the authoritative `MM/YYYY` bucket for one record.
pub fn resolve(record: &MetadataRecord, default_bucket: &str) -> String {
    let mut dates: Vec<DateTime<Utc>> = Vec::new();

    for &tag in DATE_TAGS {
        let Some(raw) = record.get(tag) else {
            continue;
        };
        // Fractional seconds are stripped before any format is tried.
        let value = raw.split('.').next().unwrap_or(raw);

        for &format in DATE_FORMATS {
            match parse_with_format(value, format) {
                Some(date) => {
                    debug!("Extracted date from tag: {} -> {}", tag, date.format("%m/%Y"));
                    dates.push(date);
                    break;
                }
                None => {
                    debug!("Failed to parse date {:?} with format {}", value, format);
                }
            }
        }
    }

    match dates.into_iter().max() {
        Some(latest) => {
            debug!("Using latest extracted date: {}", latest.format("%m/%Y"));
            latest.format("%m/%Y").to_string()
        }
        None => {
            debug!("No valid date found in metadata, using default date {default_bucket}");
            default_bucket.to_string()
        }
    }
}

/// Try one format against one value. Offset-carrying formats parse to a
/// fixed-offset datetime, naive ones are pinned to UTC, and date-only
/// formats get a midnight time.
fn parse_with_format(value: &str, format: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_str(value, format) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
        return Some(naive.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, format) {
        return Some(day.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
