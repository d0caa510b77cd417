use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{Filter, VariableFilter, WorkflowVersion};

/// Filter criteria in the shape the instance endpoints expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
  pub running: bool,
  pub active: bool,
  pub incidents: bool,
  pub finished: bool,
  pub completed: bool,
  pub canceled: bool,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub ids: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date_after: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date_before: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date_after: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date_before: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub activity_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bpmn_process_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow_version: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub variable: Option<VariableFilter>,
}

impl From<&Filter> for FilterRequest {
  fn from(filter: &Filter) -> Self {
    let (start_date_after, start_date_before) = day_range(filter.start_date);
    let (end_date_after, end_date_before) = day_range(filter.end_date);

    FilterRequest {
      running: filter.is_running(),
      active: filter.active.unwrap_or(false),
      incidents: filter.incidents.unwrap_or(false),
      finished: filter.is_finished(),
      completed: filter.completed.unwrap_or(false),
      canceled: filter.canceled.unwrap_or(false),
      ids: filter.ids.clone().unwrap_or_default(),
      error_message: filter.error_message.clone(),
      start_date_after,
      start_date_before,
      end_date_after,
      end_date_before,
      activity_id: filter.activity_id.clone(),
      bpmn_process_id: filter.workflow.clone(),
      workflow_version: match filter.version {
        Some(WorkflowVersion::Version(v)) => Some(v),
        Some(WorkflowVersion::All) | None => None,
      },
      variable: filter.variable.clone(),
    }
  }
}

/// A calendar day as the half-open UTC range `[00:00, next day 00:00)`.
fn day_range(date: Option<NaiveDate>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
  match date {
    None => (None, None),
    Some(day) => {
      let start = day.and_time(NaiveTime::MIN).and_utc();
      let end = day
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN).and_utc());
      (Some(start), end)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::filter::default_filter;

  #[test]
  fn test_default_filter_request() {
    let request = FilterRequest::from(&default_filter());
    assert!(request.running);
    assert!(request.active);
    assert!(request.incidents);
    assert!(!request.finished);
    assert!(request.ids.is_empty());
  }

  #[test]
  fn test_finished_flags() {
    let filter = Filter {
      canceled: Some(true),
      ..Filter::default()
    };
    let request = FilterRequest::from(&filter);
    assert!(!request.running);
    assert!(request.finished);
    assert!(request.canceled);
    assert!(!request.completed);
  }

  #[test]
  fn test_start_date_becomes_day_range() {
    let filter = Filter {
      start_date: NaiveDate::from_ymd_opt(2024, 3, 10),
      ..Filter::default()
    };
    let request = FilterRequest::from(&filter);
    assert_eq!(
      request.start_date_after.unwrap().to_rfc3339(),
      "2024-03-10T00:00:00+00:00"
    );
    assert_eq!(
      request.start_date_before.unwrap().to_rfc3339(),
      "2024-03-11T00:00:00+00:00"
    );
    assert_eq!(request.end_date_after, None);
  }

  #[test]
  fn test_version_all_is_unscoped() {
    let filter = Filter {
      workflow: Some("order".to_string()),
      version: Some(WorkflowVersion::All),
      ..Filter::default()
    };
    let request = FilterRequest::from(&filter);
    assert_eq!(request.bpmn_process_id.as_deref(), Some("order"));
    assert_eq!(request.workflow_version, None);
  }

  #[test]
  fn test_request_serializes_camel_case() {
    let filter = Filter {
      active: Some(true),
      activity_id: Some("approve".to_string()),
      ..Filter::default()
    };
    let json = serde_json::to_value(FilterRequest::from(&filter)).unwrap();
    assert_eq!(json["running"], true);
    assert_eq!(json["activityId"], "approve");
    assert!(json.get("ids").is_none());
    assert!(json.get("errorMessage").is_none());
  }
}
