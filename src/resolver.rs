//! Identifier resolution across bucket partitions
//!
//! Turns one ambiguous dataset identifier into up to three authoritative
//! object keys by probing candidate filenames against the store, first
//! match wins. Raw and curated are walked independently over the full
//! candidate list; metadata is probed once through a single derived base
//! name (metadata objects are named canonically as `<base>_metadata.json`,
//! so the multi-candidate walk buys nothing there — an intentional
//! asymmetry).
//!
//! Partitions fail independently: a storage error while probing one
//! partition is recorded as that partition's outcome and never discards the
//! results of its siblings.

use crate::candidates::candidate_filenames;
use crate::error::{Result, ShelfError};
use crate::keys::{basename, data_key, derive_base_name, metadata_key};
use crate::partition::Partition;
use crate::storage::ObjectStore;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A successfully resolved object within one partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    /// Full object key
    pub key: String,
    /// Filename the key was found under, used as the download name
    pub filename: String,
}

/// Outcome of resolving one partition
#[derive(Debug)]
pub enum PartitionOutcome {
    /// First candidate that exists in the store
    Found(Found),
    /// Candidate list exhausted with no match
    Missing,
    /// A probe failed; resolution for this partition was aborted
    Failed(ShelfError),
}

impl PartitionOutcome {
    pub fn as_found(&self) -> Option<&Found> {
        match self {
            PartitionOutcome::Found(found) => Some(found),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, PartitionOutcome::Missing)
    }

    pub fn as_failure(&self) -> Option<&ShelfError> {
        match self {
            PartitionOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Aggregated result of resolving an identifier across all partitions
#[derive(Debug)]
pub struct Resolution {
    pub raw: PartitionOutcome,
    pub curated: PartitionOutcome,
    pub metadata: PartitionOutcome,
    /// Every key probed, in probe order, keyed by partition — kept even for
    /// partitions that resolved, for caller-side diagnostics
    pub probed: BTreeMap<Partition, Vec<String>>,
}

impl Resolution {
    pub fn outcome(&self, partition: Partition) -> &PartitionOutcome {
        match partition {
            Partition::Raw => &self.raw,
            Partition::Curated => &self.curated,
            Partition::Metadata => &self.metadata,
        }
    }

    /// Partitions that were probed to exhaustion without a match
    pub fn missing(&self) -> Vec<Partition> {
        [Partition::Raw, Partition::Curated, Partition::Metadata]
            .into_iter()
            .filter(|p| self.outcome(*p).is_missing())
            .collect()
    }

    /// First partition-level storage failure, if any
    pub fn first_failure(&self) -> Option<(Partition, &ShelfError)> {
        [Partition::Raw, Partition::Curated, Partition::Metadata]
            .into_iter()
            .find_map(|p| self.outcome(p).as_failure().map(|e| (p, e)))
    }
}

/// Resolve `identifier` in `domain` across raw, curated and metadata.
///
/// Deterministic for a fixed set of stored objects: the outcome depends only
/// on candidate order and object existence.
pub async fn resolve(
    store: &dyn ObjectStore,
    prefix: &str,
    domain: &str,
    identifier: &str,
) -> Resolution {
    let candidates = candidate_filenames(identifier);
    debug!(
        domain,
        identifier,
        count = candidates.len(),
        "resolving dataset identifier"
    );

    let mut probed: BTreeMap<Partition, Vec<String>> = BTreeMap::new();

    let raw = probe_candidates(
        store,
        prefix,
        Partition::Raw,
        domain,
        &candidates,
        probed.entry(Partition::Raw).or_default(),
    )
    .await;

    let curated = probe_candidates(
        store,
        prefix,
        Partition::Curated,
        domain,
        &candidates,
        probed.entry(Partition::Curated).or_default(),
    )
    .await;

    let metadata =
        probe_metadata(store, prefix, domain, identifier, probed.entry(Partition::Metadata).or_default())
            .await;

    Resolution {
        raw,
        curated,
        metadata,
        probed,
    }
}

/// Resolve a single partition, as needed by the streaming path.
///
/// Probe failures are returned as errors here (the caller has nothing else
/// to report); `Ok(None)` means no candidate matched.
pub async fn resolve_partition(
    store: &dyn ObjectStore,
    prefix: &str,
    partition: Partition,
    domain: &str,
    identifier: &str,
) -> Result<Option<Found>> {
    let outcome = match partition {
        Partition::Metadata => {
            probe_metadata(store, prefix, domain, identifier, &mut Vec::new()).await
        }
        _ => {
            let candidates = candidate_filenames(identifier);
            probe_candidates(store, prefix, partition, domain, &candidates, &mut Vec::new()).await
        }
    };
    match outcome {
        PartitionOutcome::Found(found) => Ok(Some(found)),
        PartitionOutcome::Missing => Ok(None),
        PartitionOutcome::Failed(err) => Err(err),
    }
}

/// Walk the candidate list against one data partition, first match wins
async fn probe_candidates(
    store: &dyn ObjectStore,
    prefix: &str,
    partition: Partition,
    domain: &str,
    candidates: &[String],
    probed: &mut Vec<String>,
) -> PartitionOutcome {
    for candidate in candidates {
        let key = data_key(prefix, partition, domain, candidate);
        probed.push(key.clone());
        match store.exists(&key).await {
            Ok(true) => {
                debug!(%partition, %key, "candidate matched");
                return PartitionOutcome::Found(Found {
                    key,
                    filename: candidate.clone(),
                });
            }
            Ok(false) => continue,
            Err(err) => {
                warn!(%partition, %key, error = %err, "existence probe failed");
                return PartitionOutcome::Failed(err);
            }
        }
    }
    PartitionOutcome::Missing
}

/// Metadata is probed once, through the normalized base name
async fn probe_metadata(
    store: &dyn ObjectStore,
    prefix: &str,
    domain: &str,
    identifier: &str,
    probed: &mut Vec<String>,
) -> PartitionOutcome {
    let base = derive_base_name(identifier);
    let key = metadata_key(prefix, domain, &base);
    probed.push(key.clone());
    match store.exists(&key).await {
        Ok(true) => {
            let filename = basename(&key).to_string();
            PartitionOutcome::Found(Found { key, filename })
        }
        Ok(false) => PartitionOutcome::Missing,
        Err(err) => {
            warn!(%key, error = %err, "metadata probe failed");
            PartitionOutcome::Failed(err)
        }
    }
}

/// List the base names of all datasets directly under a domain's raw prefix
/// (optionally including curated), deduplicated and sorted.
pub async fn list_datasets(
    store: &dyn ObjectStore,
    prefix: &str,
    domain: &str,
    include_curated: bool,
) -> Result<Vec<String>> {
    let mut partitions = vec![Partition::Raw];
    if include_curated {
        partitions.push(Partition::Curated);
    }

    let mut bases = std::collections::BTreeSet::new();
    for partition in partitions {
        let dir = format!("{}/{}/{}/", prefix, partition.as_str(), domain);
        for key in store.list_immediate_children(&dir).await? {
            bases.insert(derive_base_name(&key));
        }
    }
    Ok(bases.into_iter().collect())
}
