/// Read-through cache of text objects kept in a remote object store
use crate::services::s3::{ObjectStore, ObjectStoreError, S3ObjectStore};
use dashmap::DashMap;
use tracing::{debug, error, warn};

/// What a fetch produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Hit(String),
    NotFound,
    Failed(String),
}

impl LoadOutcome {
    /// Collapses the outcome to the text content, empty unless `Hit`
    pub fn into_content(self) -> String {
        match self {
            Self::Hit(content) => content,
            Self::NotFound | Self::Failed(_) => String::new(),
        }
    }
}

/// Objects are fetched once per name and kept for the life of the process,
/// with no eviction or expiry. Two callers racing on an uncached name may both
/// fetch it; the first value stored is the one every later call observes.
pub struct StorageService {
    store: Box<dyn ObjectStore>,
    bucket: String,
    prefix: String,
    cache: DashMap<String, String>,
}

impl StorageService {
    pub fn new(store: impl ObjectStore + 'static, bucket: impl Into<String>) -> Self {
        Self {
            store: Box::new(store),
            bucket: bucket.into(),
            prefix: String::new(),
            cache: DashMap::new(),
        }
    }

    pub fn from_s3(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self::new(S3ObjectStore::new(client), bucket)
    }

    /// Prepends `prefix` to every object name before it is fetched
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the object's text, or an empty string if it is missing or
    /// could not be loaded. Never fails.
    pub async fn load(&self, name: &str) -> String {
        self.fetch(name).await.into_content()
    }

    /// Like [`load`](Self::load), but tells a missing object apart from a failure.
    /// Only successful fetches are cached.
    pub async fn fetch(&self, name: &str) -> LoadOutcome {
        if let Some(content) = self.cache.get(name).map(|entry| entry.value().clone()) {
            debug!(name = name, "Object served from cache");
            return LoadOutcome::Hit(content);
        }

        if name.is_empty() {
            error!(bucket = %self.bucket, "Refusing to load an object with an empty name");
            return LoadOutcome::Failed("empty object name".to_string());
        }

        let key = format!("{}{}", self.prefix, name);

        match self.store.get(&self.bucket, &key).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => {
                    let stored = self
                        .cache
                        .entry(name.to_string())
                        .or_insert(text)
                        .value()
                        .clone();
                    debug!(name = name, bytes = stored.len(), "Object cached");
                    LoadOutcome::Hit(stored)
                }
                Err(e) => {
                    error!(
                        bucket = %self.bucket,
                        key = %key,
                        error = %e,
                        "Object content is not valid UTF-8"
                    );
                    LoadOutcome::Failed(format!("invalid UTF-8 content: {}", e))
                }
            },
            Err(ObjectStoreError::NotFound) => {
                warn!(bucket = %self.bucket, key = %key, "Object not found");
                LoadOutcome::NotFound
            }
            Err(ObjectStoreError::Other(e)) => {
                error!(
                    bucket = %self.bucket,
                    key = %key,
                    error = %e,
                    "Failed to load object"
                );
                LoadOutcome::Failed(e)
            }
        }
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl Drop for StorageService {
    fn drop(&mut self) {
        debug!(
            bucket = %self.bucket,
            cached = self.cache.len(),
            "Releasing object store client"
        );
    }
}
