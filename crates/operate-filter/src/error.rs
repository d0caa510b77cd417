use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
  #[error("query string has no filter parameter")]
  Missing,

  #[error("filter is not a valid JSON object: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("filter has no criteria")]
  Empty,

  #[error("invalid date in {field}: {value}")]
  InvalidDate { field: &'static str, value: String },

  #[error("invalid workflow version: {0}")]
  InvalidVersion(String),

  #[error("invalid variable filter: {0}")]
  InvalidVariable(String),
}
