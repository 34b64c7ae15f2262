//! S3-backed object store via Apache OpenDAL
//!
//! OpenDAL keeps this vendor-agnostic: the same code serves AWS S3 and any
//! S3-compatible endpoint (MinIO, R2, Spaces) through the endpoint override.

use crate::config::Config;
use crate::error::Result;
use crate::storage::{ByteStream, ObjectStore};
use async_trait::async_trait;
use futures::StreamExt;
use opendal::{services::S3, Operator};
use std::time::Duration;
use tracing::debug;

/// Production [`ObjectStore`] over an S3 bucket
#[derive(Clone)]
pub struct S3Store {
    op: Operator,
}

impl S3Store {
    /// Build the store from service configuration.
    ///
    /// Credentials from the config take precedence; without them OpenDAL
    /// falls back to its default credential chain (env, profile, IMDS).
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = S3::default()
            .bucket(&config.bucket)
            .region(&config.region);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint(endpoint);
        }
        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            builder = builder
                .access_key_id(access_key)
                .secret_access_key(secret_key);
        }

        let op = Operator::new(builder)?.finish();
        debug!(bucket = %config.bucket, region = %config.region, "S3 store initialized");
        Ok(S3Store { op })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn exists(&self, key: &str) -> Result<bool> {
        // OpenDAL maps "object absent" to Ok(false); everything else errors
        Ok(self.op.exists(key).await?)
    }

    async fn presign_get(&self, key: &str, filename: &str, ttl: Duration) -> Result<String> {
        let disposition = format!("attachment; filename=\"{}\"", filename);
        let presigned = self
            .op
            .presign_read_with(key, ttl)
            .override_content_disposition(&disposition)
            .await?;
        Ok(presigned.uri().to_string())
    }

    async fn open_stream(&self, key: &str) -> Result<(ByteStream, String)> {
        let meta = self.op.stat(key).await?;
        let content_type = meta
            .content_type()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref())
            .to_string();

        let reader = self.op.reader(key).await?;
        let stream = reader.into_bytes_stream(..).await?;
        Ok((stream.boxed(), content_type))
    }

    async fn list_immediate_children(&self, prefix: &str) -> Result<Vec<String>> {
        // OpenDAL lists a directory path non-recursively, which is exactly
        // the one-level contract of this method.
        let dir = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };

        let entries = self.op.list(&dir).await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.metadata().mode().is_file())
            .map(|entry| entry.path().to_string())
            .collect())
    }
}
