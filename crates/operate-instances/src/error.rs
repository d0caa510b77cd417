use operate_client::ClientError;
use operate_selection::SelectionError;
use thiserror::Error;

/// Failures surfaced to the user as the page's error banner.
#[derive(Debug, Error)]
pub enum PageError {
  #[error("selection {0} does not exist")]
  SelectionNotFound(u64),

  #[error("no selection is open")]
  NoOpenSelection,

  #[error("no instances are selected")]
  EmptySelection,

  #[error("failed to fetch instances: {0}")]
  Fetch(#[from] ClientError),

  #[error("instances page is detached")]
  Detached,
}

impl From<SelectionError> for PageError {
  fn from(err: SelectionError) -> Self {
    match err {
      SelectionError::NotFound(id) => PageError::SelectionNotFound(id),
    }
  }
}
