//! Bucket partitions for processed datasets
//!
//! Every processed object lives under exactly one of three fixed subtrees:
//! `processed/raw/`, `processed/curated/` or `processed/metadata/`.

use crate::error::ShelfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical partition of the dataset bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Raw,
    Curated,
    Metadata,
}

impl Partition {
    /// Path segment used in object keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Raw => "raw",
            Partition::Curated => "curated",
            Partition::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Partition::Raw),
            "curated" => Ok(Partition::Curated),
            "metadata" => Ok(Partition::Metadata),
            _ => Err(ShelfError::InvalidInput(format!(
                "invalid partition '{}', expected raw, curated or metadata",
                s
            ))),
        }
    }
}
