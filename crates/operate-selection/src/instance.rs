use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a workflow instance as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
  Active,
  Incident,
  Completed,
  Canceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
  pub id: String,
  pub workflow_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow_version: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bpmn_process_id: Option<String>,
  pub state: InstanceState,
  pub start_date: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date: Option<DateTime<Utc>>,
}

/// Instances matching a selection payload.
///
/// `workflow_instances` is the first page only; `total_count` covers all of
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancesDetails {
  pub total_count: u64,
  #[serde(default)]
  pub workflow_instances: Vec<WorkflowInstance>,
}
