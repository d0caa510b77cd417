//! Events driving the instances page.

use std::collections::HashMap;

use operate_client::ClientError;
use operate_filter::FilterPatch;
use operate_selection::{InstancesDetails, SelectionFragment, SelectionPayload};

use crate::activity::FlowNode;
use crate::history::Location;
use crate::state::WorkflowRef;
use crate::token::RequestToken;

/// Events sent to the page by the router, the panels and the diagram.
#[derive(Debug, Clone)]
pub enum PageEvent {
  /// The router moved to a new location (back button, pasted link).
  LocationChanged(Location),

  /// Filter fields changed in the filters panel; merged into the current filter.
  FilterChanged(FilterPatch),

  /// The filters panel asked for the default filter.
  FilterReset,

  /// A workflow was picked; scopes the diagram and activity options.
  WorkflowChanged(WorkflowRef),

  /// The diagram rendered and reports its flow nodes.
  FlowNodesReady(HashMap<String, FlowNode>),

  /// The list view replaced the selection in progress.
  UpdateSelection(SelectionFragment),

  /// Pick or unpick one instance in the list view.
  ToggleInstance(String),

  /// Pick every instance matching the filter.
  SelectAll,

  /// Save the selection in progress as a new selection.
  AddNewSelection,

  /// Add the selection in progress to an existing selection.
  AddToSelection(u64),

  /// Add the selection in progress to the open selection.
  AddToOpenSelection,

  /// Open or close a selection in the selections panel.
  ToggleOpenSelection(u64),

  RemoveSelection(u64),

  /// Hide the error banner.
  DismissError,
}

/// Results of asynchronous fetches, delivered back to the page loop.
#[derive(Debug)]
pub(crate) enum Completion {
  FilterCount {
    token: RequestToken,
    result: Result<u64, ClientError>,
  },
  NewSelection {
    payload: SelectionPayload,
    result: Result<InstancesDetails, ClientError>,
  },
  SelectionExtended {
    selection_id: u64,
    payload: SelectionPayload,
    result: Result<InstancesDetails, ClientError>,
  },
}

#[derive(Debug)]
pub(crate) enum PageMessage {
  Event(PageEvent),
  Completion(Completion),
}
