use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::state::{PersistedState, StatePatch};
use crate::StateStore;

/// In-memory state store.
///
/// Suitable for tests and for a console session that should not survive a
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
  state: Mutex<PersistedState>,
}

impl InMemoryStateStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start from an existing state.
  pub fn with_state(state: PersistedState) -> Self {
    Self {
      state: Mutex::new(state),
    }
  }

  /// A copy of the current state.
  pub async fn snapshot(&self) -> PersistedState {
    self.state.lock().await.clone()
  }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
  async fn get(&self) -> Result<PersistedState, StoreError> {
    Ok(self.snapshot().await)
  }

  async fn put(&self, patch: StatePatch) -> Result<(), StoreError> {
    self.state.lock().await.apply(patch);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_in_memory_store() {
    let store = InMemoryStateStore::new();
    assert_eq!(store.get().await.unwrap(), PersistedState::default());

    store.put(StatePatch::filter_count(4)).await.unwrap();
    assert_eq!(store.get().await.unwrap().filter_count, 4);

    store.put(StatePatch::filter_count(6)).await.unwrap();
    assert_eq!(store.snapshot().await.filter_count, 6);
  }
}
