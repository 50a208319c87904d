//! The object store seam

use async_trait::async_trait;

use crate::{Result, StorageError};

/// Named buckets of text objects
///
/// Object names may contain `/` to form nested paths. Listing returns
/// names sorted ascending; an empty prefix lists everything and a prefix
/// that matches nothing yields an empty list.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or overwrite an object
    async fn put_object(&self, bucket: &str, name: &str, content: &str) -> Result<()>;

    /// Names of the objects in `bucket` starting with `prefix`
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
}

/// Reject bucket names that are empty or not a single path segment
pub(crate) fn check_bucket(bucket: &str) -> Result<()> {
    if bucket.is_empty() || bucket == "." || bucket == ".." || bucket.contains(['/', '\\']) {
        return Err(StorageError::InvalidName(bucket.to_string()));
    }
    Ok(())
}

/// Reject object names that are empty, absolute or climb out of the bucket
pub(crate) fn check_object(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('/')
        || name.contains('\\')
        || name
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}
