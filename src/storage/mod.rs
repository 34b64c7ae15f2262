//! Abstract object-storage capability
//!
//! The resolver and the HTTP layer only ever talk to storage through the
//! narrow [`ObjectStore`] trait below: existence probing, presigned-URL
//! issuance, direct streaming and one-level listing. The production
//! implementation is [`S3Store`] (Apache OpenDAL); [`MemoryStore`] backs
//! tests and local development.

mod memory;
mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::time::Duration;

/// Stream of object bytes, as produced by [`ObjectStore::open_stream`]
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Narrow storage capability used by the resolver and the HTTP layer.
///
/// The handle is long-lived and shared across in-flight requests; all
/// operations are reads and implementations must be safe for concurrent use.
///
/// An object can disappear between an [`exists`](Self::exists) probe and a
/// subsequent [`presign_get`](Self::presign_get) or
/// [`open_stream`](Self::open_stream). This window is an accepted
/// limitation: the grant call fails (or the issued URL 404s at the store)
/// and no re-verification is attempted.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether an object exists at `key`.
    ///
    /// "Object absent" is `Ok(false)`, never an error; any other failure
    /// (permissions, transport) propagates as
    /// [`ShelfError::Storage`](crate::error::ShelfError::Storage).
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Issue a time-bounded GET URL for `key`, with an attachment
    /// content-disposition naming `filename`.
    async fn presign_get(&self, key: &str, filename: &str, ttl: Duration) -> Result<String>;

    /// Open the object at `key` for streaming; returns the byte stream and
    /// the content type. Fails if the object does not exist at call time.
    async fn open_stream(&self, key: &str) -> Result<(ByteStream, String)>;

    /// Keys of objects directly under `prefix`, one level deep only; keys
    /// with a further `/` after the prefix are excluded.
    async fn list_immediate_children(&self, prefix: &str) -> Result<Vec<String>>;
}
