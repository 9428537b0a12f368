//! Word source collaborator: where a session's learning set comes from.

use serde::Deserialize;

use crate::domain::{Word, WordStatus};

/// Which words to fetch for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum WordFilter {
  /// Every word with a due date; the caller narrows to today's set
  #[default]
  Scheduled,
  Status(WordStatus),
  All,
}

pub trait WordSource: Send + Sync {
  type Error: std::error::Error;

  /// Fetch the learning set once per session setup
  fn fetch_learning_set(&self, filter: WordFilter, limit: Option<usize>) -> Result<Vec<Word>, Self::Error>;
}
