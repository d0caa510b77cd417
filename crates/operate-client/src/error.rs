use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("invalid base url: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("unexpected status {status}: {body}")]
  Status { status: u16, body: String },
}
