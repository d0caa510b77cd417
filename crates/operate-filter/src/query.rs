use url::form_urlencoded;

use crate::error::FilterError;
use crate::filter::Filter;
use crate::wire::{WireFilter, decode_fields, encode_fields};

const FILTER_PARAM: &str = "filter";

/// Extract the wire filter from a URL query string.
///
/// Accepts the search part with or without the leading `?`. The last
/// `filter` parameter wins when several are present.
pub fn parse_query_string(search: &str) -> Result<WireFilter, FilterError> {
  let search = search.strip_prefix('?').unwrap_or(search);
  let raw = form_urlencoded::parse(search.as_bytes())
    .filter(|(key, _)| key == FILTER_PARAM)
    .map(|(_, value)| value.into_owned())
    .last()
    .ok_or(FilterError::Missing)?;

  let wire: WireFilter = serde_json::from_str(&raw)?;
  Ok(wire)
}

/// Parse and decode the filter carried by a URL query string.
///
/// A filter that decodes to no criteria at all is rejected, so callers treat
/// `?filter={}` the same as a missing filter.
pub fn filter_from_query(search: &str) -> Result<Filter, FilterError> {
  let filter = decode_fields(parse_query_string(search)?)?;
  if filter.is_empty() {
    return Err(FilterError::Empty);
  }
  Ok(filter)
}

/// Encode a filter as a URL query string, including the leading `?`.
pub fn filter_query_string(filter: &Filter) -> String {
  let wire = encode_fields(filter);
  // WireFilter only holds strings and booleans
  let json = serde_json::to_string(&wire).unwrap_or_else(|_| "{}".to_string());
  let encoded = form_urlencoded::Serializer::new(String::new())
    .append_pair(FILTER_PARAM, &json)
    .finish();
  format!("?{}", encoded)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::filter::{VariableFilter, default_filter};

  #[test]
  fn test_parse_default_filter() {
    let search = filter_query_string(&default_filter());
    assert_eq!(filter_from_query(&search).unwrap(), default_filter());
  }

  #[test]
  fn test_parse_without_question_mark() {
    let search = "filter=%7B%22completed%22%3Atrue%7D";
    let filter = filter_from_query(search).unwrap();
    assert_eq!(filter.completed, Some(true));
  }

  #[test]
  fn test_parse_ignores_other_params() {
    let search = "?tab=list&filter=%7B%22canceled%22%3Atrue%7D&page=2";
    let filter = filter_from_query(search).unwrap();
    assert_eq!(filter.canceled, Some(true));
  }

  #[test]
  fn test_missing_filter() {
    assert!(matches!(filter_from_query(""), Err(FilterError::Missing)));
    assert!(matches!(
      filter_from_query("?page=1"),
      Err(FilterError::Missing)
    ));
  }

  #[test]
  fn test_malformed_filter() {
    assert!(matches!(
      filter_from_query("?filter=not-json"),
      Err(FilterError::Malformed(_))
    ));
    assert!(matches!(
      filter_from_query("?filter=%5B1%2C2%5D"),
      Err(FilterError::Malformed(_))
    ));
  }

  #[test]
  fn test_unknown_key_is_malformed() {
    let search = "?filter=%7B%22active%22%3Atrue%2C%22bogus%22%3A1%7D";
    assert!(matches!(
      filter_from_query(search),
      Err(FilterError::Malformed(_))
    ));
  }

  #[test]
  fn test_empty_filter_rejected() {
    assert!(matches!(
      filter_from_query("?filter=%7B%7D"),
      Err(FilterError::Empty)
    ));
    // only empty strings decode to nothing
    let search = "?filter=%7B%22errorMessage%22%3A%22%22%7D";
    assert!(matches!(filter_from_query(search), Err(FilterError::Empty)));
  }

  #[test]
  fn test_query_string_is_stable() {
    let filter = Filter {
      active: Some(true),
      ids: Some(vec!["1".to_string(), "2".to_string()]),
      variable: Some(VariableFilter {
        name: "customer".to_string(),
        value: "\"ACME & Co\"".to_string(),
      }),
      ..Filter::default()
    };

    let first = filter_query_string(&filter);
    let second = filter_query_string(&filter_from_query(&first).unwrap());
    assert_eq!(first, second);
  }
}
