use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::LazyLock;

/// Metadata tags inspected for a capture date, in priority order. The order
/// only decides which value gets its formats tried first; the latest parsed
/// date across all tags is authoritative.
pub const DATE_TAGS: &'static [&'static str] = &[
    "EXIF:DateTimeOriginal",
    "EXIF:CreateDate",
    "IPTC:DateCreated",
    "IPTC:DigitalCreationDate",
    "XMP:CreateDate",
    "XMP:DateCreated",
];

/// Accepted date formats, tried in order for each tag value.
pub const DATE_FORMATS: &'static [&'static str] = &[
    "%Y:%m:%d",
    "%Y:%m:%d %H:%M:%S",
    "%Y:%m:%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Rows 1..=10 of the manifest template are a fixed header; data starts at 11.
pub const MANIFEST_HEADER_ROWS: u32 = 10;

pub static CURRENT_NUM_THREADS: LazyLock<usize> = LazyLock::new(|| rayon::current_num_threads());

// Rayon thread pool for the per-item transform fanout.
// Scoped to this crate so it does not reconfigure the global Rayon pool.
pub static WORKER_RAYON_POOL: LazyLock<ThreadPool> = LazyLock::new(|| {
    ThreadPoolBuilder::new()
        .num_threads(*CURRENT_NUM_THREADS)
        .thread_name(|i| format!("batch-transform-worker-{}", i))
        .build()
        .expect("Failed to build Worker Rayon pool")
});
