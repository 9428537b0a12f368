use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::word::WordId;

/// Study mode selected for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
  #[default]
  Flashcard, // Flip card, self-grade
  Writing,   // Type the answer
}

impl StudyMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Flashcard => "flashcard",
      Self::Writing => "writing",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "flashcard" => Some(Self::Flashcard),
      "writing" => Some(Self::Writing),
      _ => None,
    }
  }

  /// Test type reported to the result recorder for grades in this mode
  pub fn test_type(&self) -> TestType {
    match self {
      Self::Flashcard => TestType::Flashcard,
      Self::Writing => TestType::Typing,
    }
  }
}

/// Kind of test a result was recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
  Flashcard,
  Typing,
}

impl TestType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Flashcard => "flashcard",
      Self::Typing => "typing",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "flashcard" => Some(Self::Flashcard),
      "typing" => Some(Self::Typing),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeResult {
  Correct,
  Incorrect,
}

impl GradeResult {
  pub fn from_bool(correct: bool) -> Self {
    if correct { Self::Correct } else { Self::Incorrect }
  }

  pub fn is_correct(&self) -> bool {
    matches!(self, Self::Correct)
  }
}

/// One graded presentation of a card, as kept in the session logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
  pub id: WordId,
  pub prompt: String,
  pub answer: String,
  pub was_correct: bool,
}

/// Grade notification handed to the result recorder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEvent {
  pub word_id: WordId,
  pub test_type: TestType,
  pub result: bool,
  pub recorded_at: DateTime<Utc>,
}

impl ResultEvent {
  pub fn new(word_id: WordId, test_type: TestType, result: bool, recorded_at: DateTime<Utc>) -> Self {
    Self {
      word_id,
      test_type,
      result,
      recorded_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_study_mode_from_str() {
    assert_eq!(StudyMode::from_str("flashcard"), Some(StudyMode::Flashcard));
    assert_eq!(StudyMode::from_str("writing"), Some(StudyMode::Writing));
    assert_eq!(StudyMode::from_str("Writing"), None); // case sensitive
    assert_eq!(StudyMode::from_str(""), None);
  }

  #[test]
  fn test_study_mode_test_type() {
    assert_eq!(StudyMode::Flashcard.test_type(), TestType::Flashcard);
    assert_eq!(StudyMode::Writing.test_type(), TestType::Typing);
  }

  #[test]
  fn test_test_type_as_str() {
    assert_eq!(TestType::Flashcard.as_str(), "flashcard");
    assert_eq!(TestType::Typing.as_str(), "typing");
    assert_eq!(TestType::from_str("typing"), Some(TestType::Typing));
    assert_eq!(TestType::from_str("writing"), None);
  }

  #[test]
  fn test_grade_result_from_bool() {
    assert_eq!(GradeResult::from_bool(true), GradeResult::Correct);
    assert_eq!(GradeResult::from_bool(false), GradeResult::Incorrect);
    assert!(GradeResult::Correct.is_correct());
    assert!(!GradeResult::Incorrect.is_correct());
  }

  #[test]
  fn test_grade_result_serde() {
    let result: GradeResult = serde_json::from_str("\"incorrect\"").unwrap();
    assert_eq!(result, GradeResult::Incorrect);
    assert_eq!(serde_json::to_string(&GradeResult::Correct).unwrap(), "\"correct\"");
  }
}
