use chrono::NaiveDate;

use crate::filter::{Filter, VariableFilter, WorkflowVersion};

/// A change to apply to a [`Filter`].
///
/// Each non-flag field has three states: `None` leaves the field alone,
/// `Some(None)` clears it, `Some(Some(value))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
  pub active: Option<bool>,
  pub incidents: Option<bool>,
  pub completed: Option<bool>,
  pub canceled: Option<bool>,
  pub ids: Option<Option<Vec<String>>>,
  pub error_message: Option<Option<String>>,
  pub start_date: Option<Option<NaiveDate>>,
  pub end_date: Option<Option<NaiveDate>>,
  pub activity_id: Option<Option<String>>,
  pub workflow: Option<Option<String>>,
  pub version: Option<Option<WorkflowVersion>>,
  pub variable: Option<Option<VariableFilter>>,
}

impl FilterPatch {
  /// True when applying the patch changes nothing.
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// Every field set in the filter is set by the patch; nothing is cleared.
impl From<Filter> for FilterPatch {
  fn from(filter: Filter) -> Self {
    FilterPatch {
      active: filter.active,
      incidents: filter.incidents,
      completed: filter.completed,
      canceled: filter.canceled,
      ids: filter.ids.map(Some),
      error_message: filter.error_message.map(Some),
      start_date: filter.start_date.map(Some),
      end_date: filter.end_date.map(Some),
      activity_id: filter.activity_id.map(Some),
      workflow: filter.workflow.map(Some),
      version: filter.version.map(Some),
      variable: filter.variable.map(Some),
    }
  }
}

impl Filter {
  /// Shallow merge: every field the patch touches replaces the field in
  /// `self`. The result is normalized, so setting an empty string or an empty
  /// id list clears the field too.
  pub fn merge(&self, patch: &FilterPatch) -> Filter {
    fn pick<T: Clone>(patch: &Option<Option<T>>, current: &Option<T>) -> Option<T> {
      match patch {
        Some(value) => value.clone(),
        None => current.clone(),
      }
    }

    let merged = Filter {
      active: patch.active.or(self.active),
      incidents: patch.incidents.or(self.incidents),
      completed: patch.completed.or(self.completed),
      canceled: patch.canceled.or(self.canceled),
      ids: pick(&patch.ids, &self.ids),
      error_message: pick(&patch.error_message, &self.error_message),
      start_date: pick(&patch.start_date, &self.start_date),
      end_date: pick(&patch.end_date, &self.end_date),
      activity_id: pick(&patch.activity_id, &self.activity_id),
      workflow: pick(&patch.workflow, &self.workflow),
      version: pick(&patch.version, &self.version),
      variable: pick(&patch.variable, &self.variable),
    };
    merged.normalized()
  }
}
