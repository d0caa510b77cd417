//! Read-only projections handed to the presentation components.

use serde::Serialize;

use crate::state::InstancesState;

/// Pane title when no workflow is picked.
pub const DEFAULT_PANE_TITLE: &str = "Workflow";

/// Counters shown in the page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderView {
  pub running: u64,
  pub incidents: u64,
  pub filters: u64,
  pub selections: u64,
}

impl InstancesState {
  pub fn header(&self) -> HeaderView {
    HeaderView {
      running: self.running,
      incidents: self.incidents,
      filters: self.filter_count,
      selections: self.selections.instances_in_selections_count(),
    }
  }

  /// Title of the diagram pane: workflow name, then id, then a placeholder.
  pub fn workflow_pane_title(&self) -> &str {
    match &self.workflow {
      Some(workflow) => workflow
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(&workflow.id),
      None => DEFAULT_PANE_TITLE,
    }
  }

  /// The diagram is only shown once a workflow is picked.
  pub fn shows_diagram(&self) -> bool {
    self.workflow.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::WorkflowRef;

  #[test]
  fn test_pane_title_fallbacks() {
    let state = InstancesState::default();
    assert_eq!(state.workflow_pane_title(), "Workflow");
    assert!(!state.shows_diagram());

    let state = state.with_workflow(WorkflowRef {
      id: "42".to_string(),
      name: None,
    });
    assert_eq!(state.workflow_pane_title(), "42");
    assert!(state.shows_diagram());

    let state = state.with_workflow(WorkflowRef {
      id: "42".to_string(),
      name: Some("Order process".to_string()),
    });
    assert_eq!(state.workflow_pane_title(), "Order process");
  }

  #[test]
  fn test_header_counts() {
    let state = InstancesState {
      running: 10,
      incidents: 2,
      filter_count: 7,
      ..InstancesState::default()
    };
    assert_eq!(
      state.header(),
      HeaderView {
        running: 10,
        incidents: 2,
        filters: 7,
        selections: 0,
      }
    );
  }
}
