use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("stored state is corrupt: {0}")]
  Corrupt(#[from] serde_json::Error),
}
