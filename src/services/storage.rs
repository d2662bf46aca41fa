use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value backend that holds encoded paste records.
///
/// Each call is a single round trip and either fully applies or not at all.
/// `compare_and_swap` is the only conditional primitive; it is what keeps
/// view decrements race-free across server instances.
#[async_trait]
pub trait PasteStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Returns whether the key existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Replaces the value at `key` only if it currently equals `expected`.
    /// Returns `false` when the key is missing or holds something else.
    async fn compare_and_swap(&self, key: &str, expected: &str, new_value: String) -> Result<bool, StoreError>;

    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: PasteStore + ?Sized> PasteStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key).await
    }

    async fn compare_and_swap(&self, key: &str, expected: &str, new_value: String) -> Result<bool, StoreError> {
        (**self).compare_and_swap(key, expected, new_value).await
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}

/// In-process store backed by `DashMap`. `compare_and_swap` holds the key's
/// shard lock, so it is atomic per key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: DashMap<String, String>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PasteStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.data.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.check()?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.data.remove(key).is_some())
    }

    async fn compare_and_swap(&self, key: &str, expected: &str, new_value: String) -> Result<bool, StoreError> {
        self.check()?;
        match self.data.get_mut(key) {
            Some(mut current) if current.value() == expected => {
                *current = new_value;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        Ok(self.data.iter().map(|e| e.key().clone()).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
