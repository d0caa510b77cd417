//! Operate Client
//!
//! The instances page talks to the backend through [`InstancesClient`]: one
//! call counts the instances matching a filter, the other fetches the
//! instances of a selection. [`HttpInstancesClient`] implements it over the
//! REST endpoints; tests substitute their own implementation.

mod error;
mod http;

pub use error::ClientError;
pub use http::HttpInstancesClient;

use async_trait::async_trait;
use operate_filter::FilterRequest;
use operate_selection::{InstancesDetails, SelectionPayload};

#[async_trait]
pub trait InstancesClient: Send + Sync {
  /// Fetch the instances matching a selection payload.
  async fn fetch_workflow_instance_by_selection(
    &self,
    payload: &SelectionPayload,
  ) -> Result<InstancesDetails, ClientError>;

  /// Count the instances matching the filter criteria.
  async fn fetch_workflow_instances_count(&self, criteria: &FilterRequest)
  -> Result<u64, ClientError>;
}
