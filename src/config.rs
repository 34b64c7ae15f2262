//! Process-wide configuration
//!
//! Loaded once at startup from the environment into an immutable value that
//! is passed explicitly into the store and the HTTP layer; nothing reads the
//! environment at request time.

use crate::error::{Result, ShelfError};
use std::env;

/// Default TTL for presigned URLs, in seconds
pub const DEFAULT_PRESIGN_TTL_SECS: u64 = 300;

/// Root prefix under which all processed partitions live
pub const DEFAULT_KEY_PREFIX: &str = "processed";

/// Immutable service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bucket holding the processed datasets
    pub bucket: String,

    /// Bucket region
    pub region: String,

    /// Optional endpoint override for S3-compatible stores
    pub endpoint: Option<String>,

    /// Root key prefix (`processed` unless overridden)
    pub prefix: String,

    /// Default presigned-URL lifetime in seconds
    pub default_ttl_secs: u64,

    /// Static credentials; when absent the storage backend falls back to its
    /// own credential chain
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `S3_BUCKET` is required; `AWS_REGION`, `S3_ENDPOINT`, `S3_PREFIX`,
    /// `PRESIGN_EXPIRES`, `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`
    /// are optional.
    pub fn from_env() -> Result<Self> {
        let bucket = env::var("S3_BUCKET")
            .map_err(|_| ShelfError::Config("S3_BUCKET must be set".to_string()))?;

        let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let endpoint = env::var("S3_ENDPOINT").ok();
        let prefix = env::var("S3_PREFIX").unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string());

        let default_ttl_secs = match env::var("PRESIGN_EXPIRES") {
            Ok(v) => v.parse::<u64>().map_err(|_| {
                ShelfError::Config(format!("PRESIGN_EXPIRES must be an integer, got '{}'", v))
            })?,
            Err(_) => DEFAULT_PRESIGN_TTL_SECS,
        };

        Ok(Config {
            bucket,
            region,
            endpoint,
            prefix,
            default_ttl_secs,
            access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
        })
    }

    /// Configuration suitable for tests and local development against the
    /// in-memory store: no bucket, default prefix and TTL.
    pub fn for_tests() -> Self {
        Config {
            bucket: "test-bucket".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            default_ttl_secs: DEFAULT_PRESIGN_TTL_SECS,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}
