//! In-process manual id allocator
//!
//! For single-process deployments without a persistence-backed sequence.
//! Multi-process deployments use `SqliteGameStore`, whose allocator is a
//! single `UPDATE ... RETURNING` statement.

use crate::error::StoreError;
use crate::ports::{GameStore, IdAllocator};
use crate::types::LocalId;
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// Atomic counter over the manual id range
#[derive(Debug)]
pub struct SequenceAllocator {
    next: AtomicI64,
}

impl SequenceAllocator {
    pub fn new(start: LocalId) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }

    /// Continue after the highest id already stored in the range
    pub async fn resume(store: &dyn GameStore, range_start: LocalId) -> Result<Self, StoreError> {
        let next = match store.max_id_from(range_start).await? {
            Some(max) => max + 1,
            None => range_start,
        };
        debug!("Manual id allocator resuming at {}", next);
        Ok(Self::new(next))
    }
}

#[async_trait]
impl IdAllocator for SequenceAllocator {
    async fn next_local_id(&self) -> Result<LocalId, StoreError> {
        Ok(self.next.fetch_add(1, Ordering::SeqCst))
    }
}
