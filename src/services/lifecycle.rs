use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::paste::{FetchOutcome, FetchedPaste, InvalidField, NewPaste, PasteRecord};
use crate::services::clock::Clock;
use crate::services::codec::{self, CodecError};
use crate::services::storage::{PasteStore, StoreError};

/// Re-reads allowed when a view decrement loses a compare-and-swap.
pub const MAX_CAS_ATTEMPTS: usize = 8;

pub type Result<T, E = PasteError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum PasteError {
    #[error("invalid argument: {0}")]
    InvalidArgument(InvalidField),
    #[error(transparent)]
    CorruptRecord(#[from] CodecError),
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

/// Creates pastes and serves them under their time and view budgets.
///
/// Expiry is lazy: a record is only evicted when an access finds it void.
/// View-limited fetches decrement with compare-and-swap against the exact
/// bytes that were read, so two concurrent readers can never both spend the
/// last view.
#[derive(Clone)]
pub struct PasteManager {
    store: Arc<dyn PasteStore>,
    clock: Arc<dyn Clock>,
}

impl PasteManager {
    pub fn new(store: Arc<dyn PasteStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub async fn create(&self, paste: NewPaste) -> Result<PasteRecord> {
        self.create_at(paste, self.clock.now_ms()).await
    }

    /// Validates and stores a new paste. Nothing touches the store when the
    /// input is rejected.
    pub async fn create_at(&self, paste: NewPaste, now: i64) -> Result<PasteRecord> {
        let paste = paste.validate().map_err(PasteError::InvalidArgument)?;
        let record = PasteRecord::new(paste, now);
        let raw = codec::encode(&record)?;
        self.store.set(&record.id, raw).await?;
        info!(
            id = %record.id,
            expires_at = ?record.expires_at,
            max_views = ?record.max_views,
            "paste created"
        );
        Ok(record)
    }

    pub async fn fetch(&self, id: &str) -> Result<FetchOutcome> {
        self.fetch_at(id, self.clock.now_ms()).await
    }

    pub async fn fetch_at(&self, id: &str, now: i64) -> Result<FetchOutcome> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(raw) = self.store.get(id).await? else {
                return Ok(FetchOutcome::NotFound);
            };
            let record = codec::decode(&raw)?;

            if let Some(reason) = record.void_reason(now) {
                self.store.delete(id).await?;
                info!(%id, ?reason, "void paste evicted");
                return Ok(reason.into());
            }

            if !record.is_view_limited() {
                return Ok(FetchOutcome::Success(served(record)));
            }

            let next = record.with_view_consumed();
            if self.store.compare_and_swap(id, &raw, codec::encode(&next)?).await? {
                return Ok(FetchOutcome::Success(served(next)));
            }
            debug!(%id, "view decrement raced another reader, retrying");
        }
        warn!(%id, attempts = MAX_CAS_ATTEMPTS, "giving up on contended view decrement");
        Err(StoreError::Unavailable(format!("paste {id} too contended to decrement")).into())
    }

    /// Deletes every void record in the store. Nothing is decremented.
    /// Records that fail to decode are left alone.
    pub async fn sweep_at(&self, now: i64) -> Result<usize> {
        let mut removed = 0;
        for key in self.store.keys().await? {
            let Some(raw) = self.store.get(&key).await? else { continue };
            let record = match codec::decode(&raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!(%key, error = %e, "skipping undecodable record during sweep");
                    continue;
                }
            };
            if record.void_reason(now).is_some() && self.store.delete(&key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    pub async fn sweep(&self) -> Result<usize> {
        self.sweep_at(self.clock.now_ms()).await
    }

    pub async fn ping(&self) -> Result<()> {
        Ok(self.store.ping().await?)
    }
}

fn served(record: PasteRecord) -> FetchedPaste {
    FetchedPaste {
        content: record.content,
        remaining_views: record.remaining_views,
        expires_at: record.expires_at,
    }
}
