//! Object key construction and dataset name parsing
//!
//! Keys follow the fixed layout `<prefix>/<partition>/<domain>/<filename>`.
//! Construction is literal joining with `/` and never fails; no
//! normalization of `domain` or `filename` is performed here.

use crate::partition::Partition;

/// Suffixes that mark a filename as belonging to a partition
const KNOWN_SUFFIXES: [&str; 3] = ["_raw", "_curated", "_metadata"];

/// Split a filename into (stem, extension), where the extension includes the
/// leading dot and is everything from the last `.` onward.
///
/// Example: `"file_raw.csv"` → `("file_raw", Some(".csv"))`; `"file"` →
/// `("file", None)`.
pub fn split_name_ext(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) => (&name[..idx], Some(&name[idx..])),
        None => (name, None),
    }
}

/// Build the key for a dataset file in one of the data partitions
pub fn data_key(prefix: &str, partition: Partition, domain: &str, filename: &str) -> String {
    format!("{}/{}/{}/{}", prefix, partition.as_str(), domain, filename)
}

/// Key for a raw dataset file
pub fn raw_key(prefix: &str, domain: &str, filename: &str) -> String {
    data_key(prefix, Partition::Raw, domain, filename)
}

/// Key for a curated dataset file
pub fn curated_key(prefix: &str, domain: &str, filename: &str) -> String {
    data_key(prefix, Partition::Curated, domain, filename)
}

/// Key for a dataset's metadata document: `<base>_metadata.json`
pub fn metadata_key(prefix: &str, domain: &str, base_name: &str) -> String {
    format!(
        "{}/{}/{}/{}_metadata.json",
        prefix,
        Partition::Metadata.as_str(),
        domain,
        base_name
    )
}

/// Final path segment of a key (the key itself if it has no `/`)
pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Derive the logical dataset base name from a key or filename.
///
/// Takes the basename, strips the extension (after the last `.`), then
/// strips known partition suffixes, repeating until the name stops
/// changing. The repetition makes the derivation idempotent even for
/// names carrying stacked suffixes or dotted stems:
/// `derive_base_name("processed/raw/ocean/foo_raw.csv")` and
/// `derive_base_name("foo")` both yield `"foo"`.
pub fn derive_base_name(name: &str) -> String {
    let mut current = basename(name).to_string();
    loop {
        let (stem, _ext) = split_name_ext(&current);
        let mut next = stem.to_string();
        for suffix in KNOWN_SUFFIXES {
            if let Some(base) = next.strip_suffix(suffix) {
                next = base.to_string();
            }
        }
        if next == current {
            return current;
        }
        current = next;
    }
}
