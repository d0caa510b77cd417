//! URL wire form of the filter.
//!
//! Everything that is not a flag travels as a string: id lists are joined
//! with commas, dates are `YYYY-MM-DD`, the variable pair is a JSON document
//! of its own. Unknown keys make the whole filter invalid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::filter::{Filter, VariableFilter, WorkflowVersion};
use crate::patch::FilterPatch;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WireFilter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub active: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub incidents: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub completed: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub canceled: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ids: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub activity_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub variable: Option<String>,
}

/// Decode the string-encoded fields of a wire filter into a [`Filter`].
///
/// Any field that fails to decode fails the whole filter.
pub fn decode_fields(wire: WireFilter) -> Result<Filter, FilterError> {
  let filter = Filter {
    active: wire.active,
    incidents: wire.incidents,
    completed: wire.completed,
    canceled: wire.canceled,
    ids: wire.ids.as_deref().map(split_ids),
    error_message: wire.error_message,
    start_date: decode_date("startDate", wire.start_date.as_deref())?,
    end_date: decode_date("endDate", wire.end_date.as_deref())?,
    activity_id: wire.activity_id,
    workflow: wire.workflow,
    version: wire.version.as_deref().map(decode_version).transpose()?.flatten(),
    variable: decode_variable(wire.variable.as_deref())?,
  };
  Ok(filter.normalized())
}

/// Decode a wire filter as a change to the current filter.
///
/// Unlike [`decode_fields`] nothing is normalized away: a key present with
/// an empty value clears that field.
pub fn decode_patch(wire: WireFilter) -> Result<FilterPatch, FilterError> {
  Ok(FilterPatch {
    active: wire.active,
    incidents: wire.incidents,
    completed: wire.completed,
    canceled: wire.canceled,
    ids: wire.ids.map(|raw| Some(split_ids(&raw)).filter(|ids| !ids.is_empty())),
    error_message: wire.error_message.map(non_blank),
    start_date: wire
      .start_date
      .map(|raw| decode_date("startDate", Some(raw.as_str())))
      .transpose()?,
    end_date: wire
      .end_date
      .map(|raw| decode_date("endDate", Some(raw.as_str())))
      .transpose()?,
    activity_id: wire.activity_id.map(non_blank),
    workflow: wire.workflow.map(non_blank),
    version: wire
      .version
      .map(|raw| decode_version(&raw))
      .transpose()?,
    variable: wire
      .variable
      .map(|raw| decode_variable(Some(raw.as_str())))
      .transpose()?,
  })
}

/// Encode a [`Filter`] into its wire form.
pub fn encode_fields(filter: &Filter) -> WireFilter {
  let filter = filter.clone().normalized();
  WireFilter {
    active: filter.active,
    incidents: filter.incidents,
    completed: filter.completed,
    canceled: filter.canceled,
    ids: filter.ids.map(|ids| ids.join(",")),
    error_message: filter.error_message,
    start_date: filter.start_date.map(|d| d.format(DATE_FORMAT).to_string()),
    end_date: filter.end_date.map(|d| d.format(DATE_FORMAT).to_string()),
    activity_id: filter.activity_id,
    workflow: filter.workflow,
    version: filter.version.map(String::from),
    variable: filter
      .variable
      .and_then(|v| serde_json::to_string(&v).ok()),
  }
}

/// Split an id list on commas and whitespace, dropping empty entries.
fn split_ids(raw: &str) -> Vec<String> {
  raw
    .split(|c: char| c == ',' || c.is_whitespace())
    .filter(|id| !id.is_empty())
    .map(str::to_string)
    .collect()
}

fn non_blank(value: String) -> Option<String> {
  Some(value).filter(|v| !v.trim().is_empty())
}

fn decode_version(raw: &str) -> Result<Option<WorkflowVersion>, FilterError> {
  match raw.trim() {
    "" => Ok(None),
    v => v.parse().map(Some),
  }
}

fn decode_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, FilterError> {
  match raw {
    None => Ok(None),
    Some(s) if s.trim().is_empty() => Ok(None),
    Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
      .map(Some)
      .map_err(|_| FilterError::InvalidDate {
        field,
        value: s.to_string(),
      }),
  }
}

fn decode_variable(raw: Option<&str>) -> Result<Option<VariableFilter>, FilterError> {
  match raw {
    None => Ok(None),
    Some(s) if s.trim().is_empty() => Ok(None),
    Some(s) => serde_json::from_str::<VariableFilter>(s)
      .map(Some)
      .map_err(|e| FilterError::InvalidVariable(e.to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_decode_ids_list() {
    let wire = WireFilter {
      ids: Some("1, 2,,3\n4".to_string()),
      ..WireFilter::default()
    };
    let filter = decode_fields(wire).unwrap();
    assert_eq!(
      filter.ids,
      Some(vec![
        "1".to_string(),
        "2".to_string(),
        "3".to_string(),
        "4".to_string()
      ])
    );
  }

  #[test]
  fn test_decode_variable() {
    let wire = WireFilter {
      variable: Some(r#"{"name":"orderId","value":"\"42\""}"#.to_string()),
      ..WireFilter::default()
    };
    let filter = decode_fields(wire).unwrap();
    assert_eq!(
      filter.variable,
      Some(VariableFilter {
        name: "orderId".to_string(),
        value: "\"42\"".to_string(),
      })
    );
  }

  #[test]
  fn test_decode_invalid_variable() {
    let wire = WireFilter {
      variable: Some("orderId=42".to_string()),
      ..WireFilter::default()
    };
    assert!(matches!(
      decode_fields(wire),
      Err(FilterError::InvalidVariable(_))
    ));
  }

  #[test]
  fn test_decode_invalid_date() {
    let wire = WireFilter {
      start_date: Some("2019-13-45".to_string()),
      ..WireFilter::default()
    };
    match decode_fields(wire) {
      Err(FilterError::InvalidDate { field, value }) => {
        assert_eq!(field, "startDate");
        assert_eq!(value, "2019-13-45");
      }
      other => panic!("expected InvalidDate, got {:?}", other),
    }
  }

  #[test]
  fn test_decode_patch_empty_values_clear() {
    let wire: WireFilter = serde_json::from_str(
      r#"{"errorMessage":"","startDate":"","version":"","variable":"","ids":""}"#,
    )
    .unwrap();
    let patch = decode_patch(wire).unwrap();
    assert_eq!(patch.error_message, Some(None));
    assert_eq!(patch.start_date, Some(None));
    assert_eq!(patch.version, Some(None));
    assert_eq!(patch.variable, Some(None));
    assert_eq!(patch.ids, Some(None));
    assert_eq!(patch.end_date, None);
    assert_eq!(patch.activity_id, None);
  }

  #[test]
  fn test_wire_patch_clears_merged_fields() {
    let base = Filter {
      active: Some(true),
      error_message: Some("timeout".to_string()),
      start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
      version: Some(WorkflowVersion::Version(3)),
      variable: Some(VariableFilter {
        name: "orderId".to_string(),
        value: "42".to_string(),
      }),
      ..Filter::default()
    };
    let wire: WireFilter = serde_json::from_str(
      r#"{"errorMessage":"","startDate":"","version":"","variable":""}"#,
    )
    .unwrap();

    let merged = base.merge(&decode_patch(wire).unwrap());
    assert_eq!(
      merged,
      Filter {
        active: Some(true),
        ..Filter::default()
      }
    );
  }

  #[test]
  fn test_decode_patch_sets_values() {
    let wire: WireFilter =
      serde_json::from_str(r#"{"endDate":"2024-03-01","version":"all","completed":true}"#).unwrap();
    let patch = decode_patch(wire).unwrap();
    assert_eq!(patch.end_date, Some(NaiveDate::from_ymd_opt(2024, 3, 1)));
    assert_eq!(patch.version, Some(Some(WorkflowVersion::All)));
    assert_eq!(patch.completed, Some(true));
  }

  #[test]
  fn test_decode_patch_rejects_bad_date() {
    let wire = WireFilter {
      end_date: Some("yesterday".to_string()),
      ..WireFilter::default()
    };
    assert!(matches!(
      decode_patch(wire),
      Err(FilterError::InvalidDate { field: "endDate", .. })
    ));
  }

  #[test]
  fn test_encode_joins_ids_and_drops_empty() {
    let filter = Filter {
      active: Some(true),
      ids: Some(vec!["7".to_string(), "8".to_string()]),
      error_message: Some(String::new()),
      start_date: NaiveDate::from_ymd_opt(2024, 2, 29),
      version: Some(WorkflowVersion::Version(2)),
      ..Filter::default()
    };

    let wire = encode_fields(&filter);
    assert_eq!(wire.ids.as_deref(), Some("7,8"));
    assert_eq!(wire.error_message, None);
    assert_eq!(wire.start_date.as_deref(), Some("2024-02-29"));
    assert_eq!(wire.version.as_deref(), Some("2"));
  }

  #[test]
  fn test_encode_then_decode_is_equivalent() {
    let filter = Filter {
      completed: Some(true),
      canceled: Some(false),
      ids: Some(vec!["a".to_string()]),
      end_date: NaiveDate::from_ymd_opt(2023, 12, 31),
      activity_id: Some("review".to_string()),
      workflow: Some("invoice".to_string()),
      version: Some(WorkflowVersion::All),
      variable: Some(VariableFilter {
        name: "amount".to_string(),
        value: "100".to_string(),
      }),
      ..Filter::default()
    };

    let decoded = decode_fields(encode_fields(&filter)).unwrap();
    assert_eq!(decoded, filter);
  }
}
