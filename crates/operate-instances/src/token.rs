//! Request tokens for discarding stale responses.

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
  pub fn value(self) -> u64 {
    self.0
  }
}

/// Issues monotonically increasing tokens for one kind of request.
///
/// Only the response carrying the latest token may be applied.
#[derive(Debug, Default)]
pub struct RequestSequence {
  latest: u64,
}

impl RequestSequence {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn issue(&mut self) -> RequestToken {
    self.latest += 1;
    RequestToken(self.latest)
  }

  pub fn is_latest(&self, token: RequestToken) -> bool {
    token.0 == self.latest
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_only_latest_token_is_current() {
    let mut sequence = RequestSequence::new();
    let first = sequence.issue();
    assert!(sequence.is_latest(first));

    let second = sequence.issue();
    assert!(second > first);
    assert!(!sequence.is_latest(first));
    assert!(sequence.is_latest(second));
  }
}
