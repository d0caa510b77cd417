use operate_filter::{Filter, FilterRequest};
use serde::{Deserialize, Serialize};

use crate::fragment::SelectionFragment;
use crate::selection::Selection;

/// One query of a selection: filter criteria plus manual picks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionQuery {
  #[serde(flatten)]
  pub criteria: FilterRequest,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub exclude_ids: Vec<String>,
}

/// Request body for fetching the instances of a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPayload {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub selection_id: Option<u64>,
  pub queries: Vec<SelectionQuery>,
}

/// Build the payload for the current filter and selection in progress.
///
/// Without `all`, the query is narrowed to the picked ids. When extending an
/// existing selection its queries come first, so the backend answers for the
/// union.
pub fn get_payload(
  filter: &Filter,
  fragment: &SelectionFragment,
  existing: Option<&Selection>,
) -> SelectionPayload {
  let mut criteria = FilterRequest::from(filter);
  if !fragment.all {
    criteria.ids = fragment.ids.iter().cloned().collect();
  }

  let query = SelectionQuery {
    criteria,
    exclude_ids: fragment.exclude_ids.iter().cloned().collect(),
  };

  let mut queries = existing
    .map(|selection| selection.queries.clone())
    .unwrap_or_default();
  queries.push(query);

  SelectionPayload {
    selection_id: existing.map(|selection| selection.selection_id),
    queries,
  }
}
