use serde::{Deserialize, Serialize};

use crate::instance::{InstancesDetails, WorkflowInstance};
use crate::payload::{SelectionPayload, SelectionQuery};

/// A saved selection of workflow instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
  pub selection_id: u64,
  pub total_count: u64,
  #[serde(default)]
  pub queries: Vec<SelectionQuery>,
  #[serde(default)]
  pub workflow_instances: Vec<WorkflowInstance>,
}

impl Selection {
  pub fn new(selection_id: u64, payload: SelectionPayload, details: InstancesDetails) -> Self {
    Self {
      selection_id,
      total_count: details.total_count,
      queries: payload.queries,
      workflow_instances: details.workflow_instances,
    }
  }

  /// Shallow merge of a new payload and its fetched details. The id is kept,
  /// everything else comes from the new data.
  pub fn merged(&self, payload: SelectionPayload, details: InstancesDetails) -> Self {
    Self::new(self.selection_id, payload, details)
  }
}
