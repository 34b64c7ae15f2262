//! # Datashelf — dataset resolution and presigned downloads
//!
//! `datashelf` resolves ambiguous dataset identifiers into concrete object
//! keys across the three partitions of a processed-data bucket
//! (`processed/raw/`, `processed/curated/`, `processed/metadata/`) and
//! issues time-limited download URLs or streams the objects directly.
//!
//! Callers rarely know the exact filename of a dataset: they pass a base
//! name (`foo`), a suffixed name (`foo_raw`) or a full filename
//! (`foo_raw.csv`). The resolver expands the identifier into an ordered
//! candidate list, probes each candidate's key for existence and takes the
//! first match per partition.
//!
//! ## Example
//!
//! ```no_run
//! use datashelf::resolver;
//! use datashelf::storage::MemoryStore;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//! store.put("processed/raw/ocean/foo_raw.csv", "col_a,col_b\n");
//!
//! let resolution = resolver::resolve(&store, "processed", "ocean", "foo").await;
//! let found = resolution.raw.as_found().unwrap();
//! assert_eq!(found.key, "processed/raw/ocean/foo_raw.csv");
//! # });
//! ```
//!
//! ## Architecture
//!
//! - [`candidates`] — pure candidate-filename generation
//! - [`keys`] — object-key construction and base-name derivation
//! - [`resolver`] — per-partition probing orchestration
//! - [`storage`] — the narrow [`storage::ObjectStore`] capability with S3
//!   (OpenDAL) and in-memory implementations
//! - [`http`] — thin axum orchestration layer

pub mod candidates;
pub mod config;
pub mod error;
pub mod http;
pub mod keys;
pub mod partition;
pub mod resolver;
pub mod storage;

pub use config::Config;
pub use error::{Result, ShelfError};
pub use partition::Partition;
pub use resolver::{Found, PartitionOutcome, Resolution};
pub use storage::{MemoryStore, ObjectStore, S3Store};
