use async_trait::async_trait;
use operate_filter::FilterRequest;
use operate_selection::{InstancesDetails, SelectionPayload};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::InstancesClient;
use crate::error::ClientError;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Body of the count endpoint.
#[derive(Debug, Serialize)]
struct CountRequest<'a> {
  queries: [&'a FilterRequest; 1],
}

#[derive(Debug, Deserialize)]
struct CountResponse {
  count: u64,
}

/// [`InstancesClient`] over the backend's REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpInstancesClient {
  client: Client,
  base_url: Url,
  page_size: u32,
}

impl HttpInstancesClient {
  /// Create a client for the backend at `base_url`.
  pub fn new(base_url: &str) -> Result<Self, ClientError> {
    Ok(Self {
      client: Client::new(),
      base_url: normalize_base(base_url)?,
      page_size: DEFAULT_PAGE_SIZE,
    })
  }

  /// Number of instances fetched with each selection.
  pub fn with_page_size(mut self, page_size: u32) -> Self {
    self.page_size = page_size;
    self
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  fn selection_url(&self) -> Result<Url, ClientError> {
    let mut url = self.base_url.join("api/workflow-instances")?;
    url
      .query_pairs_mut()
      .append_pair("firstResult", "0")
      .append_pair("maxResults", &self.page_size.to_string());
    Ok(url)
  }

  fn count_url(&self) -> Result<Url, ClientError> {
    Ok(self.base_url.join("api/workflow-instances/count")?)
  }
}

/// Make sure the base path ends in `/` so joins append instead of replace.
fn normalize_base(base_url: &str) -> Result<Url, ClientError> {
  let mut url = Url::parse(base_url)?;
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url)
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(ClientError::Status {
    status: status.as_u16(),
    body,
  })
}

#[async_trait]
impl InstancesClient for HttpInstancesClient {
  async fn fetch_workflow_instance_by_selection(
    &self,
    payload: &SelectionPayload,
  ) -> Result<InstancesDetails, ClientError> {
    let url = self.selection_url()?;
    debug!(%url, queries = payload.queries.len(), "fetching selection instances");

    let response = self.client.post(url).json(payload).send().await?;
    let details = check_status(response).await?.json::<InstancesDetails>().await?;
    Ok(details)
  }

  async fn fetch_workflow_instances_count(
    &self,
    criteria: &FilterRequest,
  ) -> Result<u64, ClientError> {
    let url = self.count_url()?;
    debug!(%url, "fetching instance count");

    let body = CountRequest {
      queries: [criteria],
    };
    let response = self.client.post(url).json(&body).send().await?;
    let count = check_status(response).await?.json::<CountResponse>().await?;
    Ok(count.count)
  }
}
