use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// A variable name/value pair an instance must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableFilter {
  pub name: String,
  pub value: String,
}

/// Workflow version criterion: a concrete version or every version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WorkflowVersion {
  All,
  Version(u32),
}

impl fmt::Display for WorkflowVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      WorkflowVersion::All => f.write_str("all"),
      WorkflowVersion::Version(v) => write!(f, "{}", v),
    }
  }
}

impl FromStr for WorkflowVersion {
  type Err = FilterError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == "all" {
      return Ok(WorkflowVersion::All);
    }
    s.parse::<u32>()
      .map(WorkflowVersion::Version)
      .map_err(|_| FilterError::InvalidVersion(s.to_string()))
  }
}

impl TryFrom<String> for WorkflowVersion {
  type Error = FilterError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<WorkflowVersion> for String {
  fn from(value: WorkflowVersion) -> Self {
    value.to_string()
  }
}

/// The decoded instance filter.
///
/// Every field is optional; an absent field places no constraint on the
/// instance set. Changes are applied with [`Filter::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub active: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub incidents: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub completed: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub canceled: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ids: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub activity_id: Option<String>,
  /// Process definition key (bpmn process id).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<WorkflowVersion>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub variable: Option<VariableFilter>,
}

/// The filter applied when the URL carries none: running instances, with and
/// without incidents.
pub fn default_filter() -> Filter {
  Filter {
    active: Some(true),
    incidents: Some(true),
    ..Filter::default()
  }
}

impl Filter {
  /// Drop empty strings and empty lists so they never reach the URL.
  pub fn normalized(mut self) -> Filter {
    fn non_empty(value: Option<String>) -> Option<String> {
      value.filter(|v| !v.trim().is_empty())
    }

    self.ids = self.ids.filter(|ids| !ids.is_empty());
    self.error_message = non_empty(self.error_message);
    self.activity_id = non_empty(self.activity_id);
    self.workflow = non_empty(self.workflow);
    self.variable = self
      .variable
      .filter(|v| !v.name.trim().is_empty());
    self
  }

  /// True when no field is set.
  pub fn is_empty(&self) -> bool {
    *self == Filter::default()
  }

  /// True when the filter selects running instances (active or with incidents).
  pub fn is_running(&self) -> bool {
    self.active.unwrap_or(false) || self.incidents.unwrap_or(false)
  }

  /// True when the filter selects finished instances (completed or canceled).
  pub fn is_finished(&self) -> bool {
    self.completed.unwrap_or(false) || self.canceled.unwrap_or(false)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_filter_selects_running() {
    let filter = default_filter();
    assert!(filter.is_running());
    assert!(!filter.is_finished());
    assert!(!filter.is_empty());
  }

  #[test]
  fn test_workflow_version_parse() {
    assert_eq!("all".parse::<WorkflowVersion>().unwrap(), WorkflowVersion::All);
    assert_eq!(
      "3".parse::<WorkflowVersion>().unwrap(),
      WorkflowVersion::Version(3)
    );
    assert!("latest".parse::<WorkflowVersion>().is_err());
  }
}
