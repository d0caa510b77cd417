use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The selection being assembled in the list view, before it is saved.
///
/// Either a set of picked instance ids, or "everything matching the filter"
/// minus a set of excluded ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionFragment {
  #[serde(default)]
  pub ids: BTreeSet<String>,
  #[serde(default)]
  pub exclude_ids: BTreeSet<String>,
  #[serde(default)]
  pub all: bool,
}

impl SelectionFragment {
  pub fn new() -> Self {
    Self::default()
  }

  /// Flip the selected state of one instance.
  pub fn toggle(&mut self, instance_id: &str) {
    let set = if self.all {
      &mut self.exclude_ids
    } else {
      &mut self.ids
    };
    if !set.remove(instance_id) {
      set.insert(instance_id.to_string());
    }
  }

  /// Select every instance matching the filter.
  pub fn select_all(&mut self) {
    self.all = true;
    self.ids.clear();
    self.exclude_ids.clear();
  }

  pub fn is_selected(&self, instance_id: &str) -> bool {
    if self.all {
      !self.exclude_ids.contains(instance_id)
    } else {
      self.ids.contains(instance_id)
    }
  }

  /// True when nothing is picked.
  pub fn is_empty(&self) -> bool {
    !self.all && self.ids.is_empty()
  }
}
