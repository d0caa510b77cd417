use operate_filter::Filter;
use operate_selection::{Selection, SelectionList};
use serde::{Deserialize, Serialize};

/// Everything the instances page keeps across reloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filter: Option<Filter>,
  pub filter_count: u64,
  pub selections: Vec<Selection>,
  pub rolling_selection_index: u64,
  pub selection_count: u64,
  pub instances_in_selections_count: u64,
  /// Running instance total shown in the header.
  pub running: u64,
  /// Incident total shown in the header.
  pub incidents: u64,
}

impl PersistedState {
  /// The stored selections as a validated [`SelectionList`].
  pub fn selection_list(&self) -> SelectionList {
    SelectionList::restore(
      self.selections.clone(),
      self.rolling_selection_index,
      self.selection_count,
      self.instances_in_selections_count,
    )
  }

  /// Merge a partial update; fields absent from the patch are kept.
  pub fn apply(&mut self, patch: StatePatch) {
    if let Some(filter) = patch.filter {
      self.filter = Some(filter);
    }
    if let Some(filter_count) = patch.filter_count {
      self.filter_count = filter_count;
    }
    if let Some(selections) = patch.selections {
      self.selections = selections;
    }
    if let Some(index) = patch.rolling_selection_index {
      self.rolling_selection_index = index;
    }
    if let Some(count) = patch.selection_count {
      self.selection_count = count;
    }
    if let Some(count) = patch.instances_in_selections_count {
      self.instances_in_selections_count = count;
    }
    if let Some(running) = patch.running {
      self.running = running;
    }
    if let Some(incidents) = patch.incidents {
      self.incidents = incidents;
    }
  }
}

/// A partial update of [`PersistedState`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
  pub filter: Option<Filter>,
  pub filter_count: Option<u64>,
  pub selections: Option<Vec<Selection>>,
  pub rolling_selection_index: Option<u64>,
  pub selection_count: Option<u64>,
  pub instances_in_selections_count: Option<u64>,
  pub running: Option<u64>,
  pub incidents: Option<u64>,
}

impl StatePatch {
  pub fn filter(filter: Filter) -> Self {
    Self {
      filter: Some(filter),
      ..Self::default()
    }
  }

  pub fn filter_count(filter_count: u64) -> Self {
    Self {
      filter_count: Some(filter_count),
      ..Self::default()
    }
  }

  /// All four selection-list fields in one patch.
  pub fn selection_list(list: &SelectionList) -> Self {
    Self {
      selections: Some(list.selections().to_vec()),
      rolling_selection_index: Some(list.rolling_selection_index()),
      selection_count: Some(list.selection_count()),
      instances_in_selections_count: Some(list.instances_in_selections_count()),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use operate_filter::default_filter;
  use operate_selection::{InstancesDetails, SelectionPayload};

  #[test]
  fn test_missing_keys_default_to_zero() {
    let state: PersistedState = serde_json::from_str("{}").unwrap();
    assert_eq!(state, PersistedState::default());
    assert_eq!(state.filter, None);
    assert_eq!(state.filter_count, 0);
    assert!(state.selections.is_empty());
  }

  #[test]
  fn test_partial_document() {
    let state: PersistedState =
      serde_json::from_str(r#"{"filterCount": 12, "running": 40, "incidents": 3}"#).unwrap();
    assert_eq!(state.filter_count, 12);
    assert_eq!(state.running, 40);
    assert_eq!(state.incidents, 3);
    assert_eq!(state.rolling_selection_index, 0);
  }

  #[test]
  fn test_apply_keeps_other_fields() {
    let mut state = PersistedState {
      filter_count: 3,
      running: 9,
      ..PersistedState::default()
    };
    state.apply(StatePatch::filter(default_filter()));

    assert_eq!(state.filter, Some(default_filter()));
    assert_eq!(state.filter_count, 3);
    assert_eq!(state.running, 9);
  }

  #[test]
  fn test_selection_list_patch_is_one_batch() {
    let list = SelectionList::new().with_new_selection(
      SelectionPayload::default(),
      InstancesDetails {
        total_count: 5,
        workflow_instances: vec![],
      },
    );

    let mut state = PersistedState::default();
    state.apply(StatePatch::selection_list(&list));

    assert_eq!(state.selections.len(), 1);
    assert_eq!(state.rolling_selection_index, 1);
    assert_eq!(state.selection_count, 1);
    assert_eq!(state.instances_in_selections_count, 5);
    assert_eq!(state.selection_list(), list);
  }

  #[test]
  fn test_oversized_counts_load_without_overflow() {
    let state: PersistedState = serde_json::from_str(
      r#"{
        "selections": [
          {"selectionId": 1, "totalCount": 18446744073709551615},
          {"selectionId": 2, "totalCount": 18446744073709551615}
        ],
        "rollingSelectionIndex": 2,
        "selectionCount": 2
      }"#,
    )
    .unwrap();

    let list = state.selection_list();
    assert_eq!(list.selection_count(), 2);
    assert_eq!(list.instances_in_selections_count(), u64::MAX);
  }

  #[test]
  fn test_empty_patch() {
    assert!(StatePatch::default().is_empty());
    assert!(!StatePatch::filter_count(0).is_empty());
  }
}
