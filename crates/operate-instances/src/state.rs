//! The instances page snapshot and its transitions.
//!
//! Every transition takes the current snapshot by reference and returns the
//! next one. The page commits a result whole, so no observer sees a selection
//! list whose counters lag behind its entries.

use std::collections::HashMap;

use operate_filter::Filter;
use operate_selection::{InstancesDetails, SelectionFragment, SelectionList, SelectionPayload};
use operate_store::PersistedState;
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityOption, FlowNode, activity_options};
use crate::error::PageError;

/// The workflow the user picked in the filters panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRef {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancesState {
  pub activity_ids: Vec<ActivityOption>,
  pub filter: Filter,
  pub filter_count: u64,
  pub open_selection: Option<u64>,
  /// Selection in progress in the list view.
  pub selection: SelectionFragment,
  #[serde(flatten)]
  pub selections: SelectionList,
  pub workflow: Option<WorkflowRef>,
  pub error_message: Option<String>,
  pub running: u64,
  pub incidents: u64,
}

impl InstancesState {
  /// Initial snapshot from whatever the store held. The filter stays empty
  /// until the URL has been read.
  pub fn from_persisted(persisted: &PersistedState) -> Self {
    Self {
      filter_count: persisted.filter_count,
      selections: persisted.selection_list(),
      running: persisted.running,
      incidents: persisted.incidents,
      ..Self::default()
    }
  }

  pub fn with_filter(&self, filter: Filter) -> Self {
    Self {
      filter,
      ..self.clone()
    }
  }

  pub fn with_filter_count(&self, filter_count: u64) -> Self {
    Self {
      filter_count,
      ..self.clone()
    }
  }

  pub fn with_workflow(&self, workflow: WorkflowRef) -> Self {
    Self {
      workflow: Some(workflow),
      ..self.clone()
    }
  }

  /// Replace the activity options with the tasks of `nodes`.
  pub fn with_flow_nodes(&self, nodes: &HashMap<String, FlowNode>) -> Self {
    Self {
      activity_ids: activity_options(nodes),
      ..self.clone()
    }
  }

  pub fn with_selection_fragment(&self, selection: SelectionFragment) -> Self {
    Self {
      selection,
      ..self.clone()
    }
  }

  /// Save a new selection, open it, and start a fresh selection in progress.
  pub fn with_new_selection(&self, payload: SelectionPayload, details: InstancesDetails) -> Self {
    let selections = self.selections.with_new_selection(payload, details);
    let open_selection = selections.selections().first().map(|s| s.selection_id);
    Self {
      selections,
      open_selection,
      selection: SelectionFragment::new(),
      ..self.clone()
    }
  }

  /// Merge fetched data into an existing selection and clear the selection in
  /// progress.
  pub fn with_merged_selection(
    &self,
    selection_id: u64,
    payload: SelectionPayload,
    details: InstancesDetails,
  ) -> Result<Self, PageError> {
    let selections = self
      .selections
      .with_merged_selection(selection_id, payload, details)?;
    Ok(Self {
      selections,
      selection: SelectionFragment::new(),
      ..self.clone()
    })
  }

  pub fn without_selection(&self, selection_id: u64) -> Result<Self, PageError> {
    let selections = self.selections.without_selection(selection_id)?;
    let open_selection = self.open_selection.filter(|open| *open != selection_id);
    Ok(Self {
      selections,
      open_selection,
      ..self.clone()
    })
  }

  /// Open a selection, or close it if it is already open.
  pub fn with_open_selection_toggled(&self, selection_id: u64) -> Result<Self, PageError> {
    if self.selections.get(selection_id).is_none() {
      return Err(PageError::SelectionNotFound(selection_id));
    }
    let open_selection = if self.open_selection == Some(selection_id) {
      None
    } else {
      Some(selection_id)
    };
    Ok(Self {
      open_selection,
      ..self.clone()
    })
  }

  pub fn with_error(&self, message: impl Into<String>) -> Self {
    Self {
      error_message: Some(message.into()),
      ..self.clone()
    }
  }

  pub fn without_error(&self) -> Self {
    Self {
      error_message: None,
      ..self.clone()
    }
  }
}
