use serde::Serialize;
use tracing::warn;

use crate::error::SelectionError;
use crate::instance::InstancesDetails;
use crate::payload::SelectionPayload;
use crate::selection::Selection;

/// The saved selections, newest first, and their counters.
///
/// Invariants held by every constructor and transition:
/// - `selection_count == selections.len()`
/// - `instances_in_selections_count` is the sum of every `total_count`
/// - `rolling_selection_index` is at least every selection id; it only grows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionList {
  selections: Vec<Selection>,
  rolling_selection_index: u64,
  selection_count: u64,
  instances_in_selections_count: u64,
}

impl SelectionList {
  pub fn new() -> Self {
    Self::default()
  }

  /// Rebuild a list from stored parts, repairing counters that disagree with
  /// the selections themselves.
  pub fn restore(
    selections: Vec<Selection>,
    rolling_selection_index: u64,
    selection_count: u64,
    instances_in_selections_count: u64,
  ) -> Self {
    let actual_count = selections.len() as u64;
    let actual_instances = selections
      .iter()
      .fold(0u64, |sum, s| sum.saturating_add(s.total_count));
    let highest_id = selections
      .iter()
      .map(|s| s.selection_id)
      .max()
      .unwrap_or(0);

    if selection_count != actual_count {
      warn!(
        stored = selection_count,
        actual = actual_count,
        "stored selection count disagrees with selections, recomputing"
      );
    }
    if instances_in_selections_count != actual_instances {
      warn!(
        stored = instances_in_selections_count,
        actual = actual_instances,
        "stored instances-in-selections count disagrees with selections, recomputing"
      );
    }
    if rolling_selection_index < highest_id {
      warn!(
        stored = rolling_selection_index,
        highest_id, "stored selection index is behind existing ids, raising"
      );
    }

    Self {
      selections,
      rolling_selection_index: rolling_selection_index.max(highest_id),
      selection_count: actual_count,
      instances_in_selections_count: actual_instances,
    }
  }

  pub fn selections(&self) -> &[Selection] {
    &self.selections
  }

  pub fn rolling_selection_index(&self) -> u64 {
    self.rolling_selection_index
  }

  pub fn selection_count(&self) -> u64 {
    self.selection_count
  }

  pub fn instances_in_selections_count(&self) -> u64 {
    self.instances_in_selections_count
  }

  pub fn get(&self, selection_id: u64) -> Option<&Selection> {
    self
      .selections
      .iter()
      .find(|s| s.selection_id == selection_id)
  }

  fn position(&self, selection_id: u64) -> Result<usize, SelectionError> {
    self
      .selections
      .iter()
      .position(|s| s.selection_id == selection_id)
      .ok_or(SelectionError::NotFound(selection_id))
  }

  /// Prepend a new selection with the next id.
  pub fn with_new_selection(&self, payload: SelectionPayload, details: InstancesDetails) -> Self {
    let selection_id = self.rolling_selection_index.saturating_add(1);
    let selection = Selection::new(selection_id, payload, details);

    let mut selections = Vec::with_capacity(self.selections.len() + 1);
    selections.push(selection.clone());
    selections.extend(self.selections.iter().cloned());

    Self {
      selections,
      rolling_selection_index: selection_id,
      selection_count: self.selection_count.saturating_add(1),
      instances_in_selections_count: self
        .instances_in_selections_count
        .saturating_add(selection.total_count),
    }
  }

  /// Merge newly fetched data into an existing selection, keeping its place.
  pub fn with_merged_selection(
    &self,
    selection_id: u64,
    payload: SelectionPayload,
    details: InstancesDetails,
  ) -> Result<Self, SelectionError> {
    let index = self.position(selection_id)?;
    let previous = &self.selections[index];
    let merged = previous.merged(payload, details);

    let instances_in_selections_count = self
      .instances_in_selections_count
      .saturating_sub(previous.total_count)
      .saturating_add(merged.total_count);

    let mut selections = self.selections.clone();
    selections[index] = merged;

    Ok(Self {
      selections,
      rolling_selection_index: self.rolling_selection_index,
      selection_count: self.selection_count,
      instances_in_selections_count,
    })
  }

  /// Drop a selection. Its id is never handed out again.
  pub fn without_selection(&self, selection_id: u64) -> Result<Self, SelectionError> {
    let index = self.position(selection_id)?;
    let removed = &self.selections[index];

    let mut selections = self.selections.clone();
    selections.remove(index);

    Ok(Self {
      instances_in_selections_count: self
        .instances_in_selections_count
        .saturating_sub(removed.total_count),
      selections,
      rolling_selection_index: self.rolling_selection_index,
      selection_count: self.selection_count.saturating_sub(1),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn details(total_count: u64) -> InstancesDetails {
    InstancesDetails {
      total_count,
      workflow_instances: vec![],
    }
  }

  fn assert_counters_hold(list: &SelectionList) {
    assert_eq!(list.selection_count(), list.selections().len() as u64);
    assert_eq!(
      list.instances_in_selections_count(),
      list.selections().iter().map(|s| s.total_count).sum::<u64>()
    );
  }

  #[test]
  fn test_new_selection_goes_first() {
    let list = SelectionList::new()
      .with_new_selection(SelectionPayload::default(), details(5))
      .with_new_selection(SelectionPayload::default(), details(2));

    assert_eq!(list.selections()[0].selection_id, 2);
    assert_eq!(list.selections()[1].selection_id, 1);
    assert_eq!(list.selection_count(), 2);
    assert_eq!(list.instances_in_selections_count(), 7);
    assert_eq!(list.rolling_selection_index(), 2);
    assert_counters_hold(&list);
  }

  #[test]
  fn test_ids_are_one_to_n() {
    let mut list = SelectionList::new();
    for _ in 0..10 {
      list = list.with_new_selection(SelectionPayload::default(), details(1));
    }
    let mut ids: Vec<u64> = list.selections().iter().map(|s| s.selection_id).collect();
    ids.sort();
    assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
    assert_eq!(list.rolling_selection_index(), 10);
  }

  #[test]
  fn test_transition_leaves_original_untouched() {
    let before = SelectionList::new().with_new_selection(SelectionPayload::default(), details(1));
    let after = before.with_new_selection(SelectionPayload::default(), details(3));

    assert_eq!(before.selection_count(), 1);
    assert_eq!(after.selection_count(), 2);
  }

  #[test]
  fn test_merge_keeps_position_and_others() {
    let list = SelectionList::new()
      .with_new_selection(SelectionPayload::default(), details(1))
      .with_new_selection(SelectionPayload::default(), details(2))
      .with_new_selection(SelectionPayload::default(), details(3));

    let merged = list
      .with_merged_selection(2, SelectionPayload::default(), details(20))
      .unwrap();

    let ids: Vec<u64> = merged.selections().iter().map(|s| s.selection_id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(merged.selections()[1].total_count, 20);
    assert_eq!(merged.selections()[0], list.selections()[0]);
    assert_eq!(merged.selections()[2], list.selections()[2]);
    assert_eq!(merged.instances_in_selections_count(), 24);
    assert_eq!(merged.rolling_selection_index(), 3);
    assert_counters_hold(&merged);
  }

  #[test]
  fn test_merge_unknown_id() {
    let list = SelectionList::new().with_new_selection(SelectionPayload::default(), details(1));
    assert_eq!(
      list.with_merged_selection(9, SelectionPayload::default(), details(1)),
      Err(SelectionError::NotFound(9))
    );
  }

  #[test]
  fn test_remove_never_reuses_ids() {
    let list = SelectionList::new()
      .with_new_selection(SelectionPayload::default(), details(4))
      .with_new_selection(SelectionPayload::default(), details(6));

    let list = list.without_selection(2).unwrap();
    assert_eq!(list.selection_count(), 1);
    assert_eq!(list.instances_in_selections_count(), 4);
    assert_eq!(list.rolling_selection_index(), 2);

    let list = list.with_new_selection(SelectionPayload::default(), details(1));
    assert_eq!(list.selections()[0].selection_id, 3);
    assert_counters_hold(&list);

    assert_eq!(
      list.without_selection(2),
      Err(SelectionError::NotFound(2))
    );
  }

  #[test]
  fn test_restore_repairs_counters() {
    let source = SelectionList::new()
      .with_new_selection(SelectionPayload::default(), details(4))
      .with_new_selection(SelectionPayload::default(), details(6));

    let restored = SelectionList::restore(source.selections().to_vec(), 0, 7, 1);
    assert_eq!(restored.selection_count(), 2);
    assert_eq!(restored.instances_in_selections_count(), 10);
    assert_eq!(restored.rolling_selection_index(), 2);
  }

  #[test]
  fn test_restore_keeps_consistent_state() {
    let restored = SelectionList::restore(vec![], 5, 0, 0);
    assert_eq!(restored.rolling_selection_index(), 5);
    assert!(restored.selections().is_empty());
  }

  #[test]
  fn test_restore_huge_counts_saturate() {
    let huge = |selection_id| Selection {
      selection_id,
      total_count: u64::MAX - 1,
      queries: vec![],
      workflow_instances: vec![],
    };

    let restored = SelectionList::restore(vec![huge(2), huge(1)], 2, 2, 0);
    assert_eq!(restored.instances_in_selections_count(), u64::MAX);

    let grown = restored.with_new_selection(SelectionPayload::default(), details(5));
    assert_eq!(grown.instances_in_selections_count(), u64::MAX);
    assert_eq!(grown.selection_count(), 3);

    let merged = grown
      .with_merged_selection(1, SelectionPayload::default(), details(1))
      .unwrap();
    assert_eq!(merged.selection_count(), 3);
  }

  #[test]
  fn test_new_selection_at_max_index_does_not_panic() {
    let list = SelectionList::restore(vec![], u64::MAX, 0, 0);
    let list = list.with_new_selection(SelectionPayload::default(), details(1));
    assert_eq!(list.rolling_selection_index(), u64::MAX);
  }
}
