//! In-memory object store for tests and local development
//!
//! Holds objects in a process-local map and fabricates `memory://` URLs for
//! presign requests. Probe failures can be injected per key prefix to
//! exercise the resolver's error propagation without a real store.

use crate::error::Result;
use crate::storage::{ByteStream, ObjectStore};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use opendal::ErrorKind;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// In-memory [`ObjectStore`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, StoredObject>,
    fail_prefixes: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object with the default content type
    pub fn put(&self, key: &str, data: impl Into<Bytes>) {
        self.put_with_content_type(key, data, mime::APPLICATION_OCTET_STREAM.as_ref());
    }

    /// Insert an object with an explicit content type
    pub fn put_with_content_type(&self, key: &str, data: impl Into<Bytes>, content_type: &str) {
        self.inner.write().objects.insert(
            key.to_string(),
            StoredObject {
                data: data.into(),
                content_type: content_type.to_string(),
            },
        );
    }

    /// Make every operation on keys under `prefix` fail with a simulated
    /// permission error, for testing error propagation
    pub fn fail_on_prefix(&self, prefix: &str) {
        self.inner.write().fail_prefixes.push(prefix.to_string());
    }

    fn check_access(&self, key: &str) -> Result<()> {
        let inner = self.inner.read();
        if inner.fail_prefixes.iter().any(|p| key.starts_with(p.as_str())) {
            return Err(opendal::Error::new(
                ErrorKind::PermissionDenied,
                "access denied by test configuration",
            )
            .into());
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<StoredObject> {
        self.inner.read().objects.get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        self.check_access(key)?;
        Ok(self.inner.read().objects.contains_key(key))
    }

    async fn presign_get(&self, key: &str, filename: &str, ttl: Duration) -> Result<String> {
        self.check_access(key)?;
        if self.get(key).is_none() {
            return Err(
                opendal::Error::new(ErrorKind::NotFound, "object not found").into(),
            );
        }
        Ok(format!(
            "memory://{}?filename={}&expires={}",
            key,
            filename,
            ttl.as_secs()
        ))
    }

    async fn open_stream(&self, key: &str) -> Result<(ByteStream, String)> {
        self.check_access(key)?;
        let object = self.get(key).ok_or_else(|| {
            crate::error::ShelfError::from(opendal::Error::new(
                ErrorKind::NotFound,
                "object not found",
            ))
        })?;
        let stream = futures::stream::once(async move { Ok(object.data) }).boxed();
        Ok((stream, object.content_type))
    }

    async fn list_immediate_children(&self, prefix: &str) -> Result<Vec<String>> {
        self.check_access(prefix)?;
        let dir = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };

        Ok(self
            .inner
            .read()
            .objects
            .keys()
            .filter(|key| {
                key.strip_prefix(dir.as_str())
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .cloned()
            .collect())
    }
}
