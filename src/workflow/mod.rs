pub mod batch;
pub mod partition;
pub mod transform;

use std::path::PathBuf;

/// One unit of work: an image file plus the stem its metadata document is
/// keyed by. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub file_name: String,
    pub stem: String,
    pub path: PathBuf,
}
