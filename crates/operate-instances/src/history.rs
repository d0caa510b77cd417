//! Browser-history seam: where the page reads and writes its URL.

use std::sync::Mutex;

/// The part of a URL the instances page cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
  pub pathname: String,
  /// Query string including the leading `?`, or empty.
  pub search: String,
}

impl Location {
  pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
    Self {
      pathname: pathname.into(),
      search: search.into(),
    }
  }
}

/// Navigation history owned by the router.
pub trait History: Send + Sync {
  /// The current location.
  fn location(&self) -> Location;

  /// Push a new entry; it becomes the current location.
  fn push(&self, location: Location);
}

/// History kept in memory, for tests and headless use.
#[derive(Debug)]
pub struct MemoryHistory {
  entries: Mutex<Vec<Location>>,
}

impl MemoryHistory {
  pub fn new(initial: Location) -> Self {
    Self {
      entries: Mutex::new(vec![initial]),
    }
  }

  /// Every location visited, oldest first.
  pub fn entries(&self) -> Vec<Location> {
    self
      .entries
      .lock()
      .unwrap_or_else(|e| e.into_inner())
      .clone()
  }
}

impl History for MemoryHistory {
  fn location(&self) -> Location {
    self
      .entries
      .lock()
      .unwrap_or_else(|e| e.into_inner())
      .last()
      .cloned()
      .unwrap_or_default()
  }

  fn push(&self, location: Location) {
    self
      .entries
      .lock()
      .unwrap_or_else(|e| e.into_inner())
      .push(location);
  }
}
