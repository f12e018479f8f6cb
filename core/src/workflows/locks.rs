// core/src/workflows/locks.rs

use crate::models::UserId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per owner, created on first use.
///
/// Checkout holds its owner's guard for the whole run and every cart mutation
/// takes it too, so one owner's cart changes are serialized. Different owners
/// never wait on each other.
#[derive(Debug, Default)]
pub struct OwnerLocks {
  locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl OwnerLocks {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn acquire(&self, owner_id: UserId) -> OwnedMutexGuard<()> {
    let lock = {
      let mut locks = self.locks.lock();
      // Entries nobody is holding or waiting on can go.
      locks.retain(|id, lock| *id == owner_id || Arc::strong_count(lock) > 1);
      locks.entry(owner_id).or_default().clone()
    };
    lock.lock_owned().await
  }

  #[cfg(test)]
  fn len(&self) -> usize {
    self.locks.lock().len()
  }
}
