use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub type WordId = i64;

/// Learning status owned by the backend scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WordStatus {
  #[default]
  Unknown,
  Learning,
  Known,
}

impl WordStatus {
  pub fn from_str(s: &str) -> Self {
    match s {
      "learning" => Self::Learning,
      "known" => Self::Known,
      _ => Self::Unknown,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Unknown => "unknown",
      Self::Learning => "learning",
      Self::Known => "known",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
  pub id: WordId,
  pub term: String,
  pub translation: String,
  /// Raw due timestamp as delivered by the word source (None = never scheduled)
  pub next_review_due_at: Option<String>,
  #[serde(default)]
  pub status: WordStatus,
}

impl Word {
  pub fn new(id: WordId, term: impl Into<String>, translation: impl Into<String>) -> Self {
    Self {
      id,
      term: term.into(),
      translation: translation.into(),
      next_review_due_at: None,
      status: WordStatus::Unknown,
    }
  }

  pub fn with_due(mut self, due: impl Into<String>) -> Self {
    self.next_review_due_at = Some(due.into());
    self
  }

  pub fn with_status(mut self, status: WordStatus) -> Self {
    self.status = status;
    self
  }

  /// Parsed due timestamp. Missing or unparseable values yield None.
  pub fn due_at(&self) -> Option<DateTime<Utc>> {
    self.next_review_due_at.as_deref().and_then(parse_due_timestamp)
  }
}

/// Parse a due timestamp in any of the shapes the backend emits.
///
/// Timestamps without an offset are taken as UTC; bare dates as UTC midnight.
pub fn parse_due_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }

  for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
      return Some(naive.and_utc());
    }
  }

  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|date| date.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}
