//! Operate Store
//!
//! Durable mirror of the instances page state. The page reads it once when it
//! mounts and writes partial updates after each state-affecting action; there
//! is no subscription in the other direction.
//!
//! Keys missing from the stored document fall back to zero or empty, so a
//! store written by an older console still loads.

mod error;
mod file;
mod memory;
mod state;

pub use error::StoreError;
pub use file::FileStateStore;
pub use memory::InMemoryStateStore;
pub use state::{PersistedState, StatePatch};

use async_trait::async_trait;

/// Storage for the persisted page state.
#[async_trait]
pub trait StateStore: Send + Sync {
  /// Read the whole stored state.
  async fn get(&self) -> Result<PersistedState, StoreError>;

  /// Merge a partial update into the stored state as one write.
  async fn put(&self, patch: StatePatch) -> Result<(), StoreError>;
}
