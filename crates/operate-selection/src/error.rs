use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
  #[error("selection not found: {0}")]
  NotFound(u64),
}
