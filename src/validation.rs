//! Typed-answer grading for writing mode.
//!
//! Matching is exact after normalization: surrounding whitespace is trimmed,
//! case is folded and both sides are brought to Unicode NFC so composed and
//! decomposed accents compare equal. There is no typo tolerance and no
//! partial credit.

use unicode_normalization::UnicodeNormalization;

use crate::domain::GradeResult;

/// Normalize an answer for comparison
pub fn normalize_answer(input: &str) -> String {
  input.trim().nfc().collect::<String>().to_lowercase()
}

pub fn answers_match(user_input: &str, expected: &str) -> bool {
  normalize_answer(user_input) == normalize_answer(expected)
}

/// Grade a typed answer against the expected side of the card
pub fn grade_typed_answer(user_input: &str, expected: &str) -> GradeResult {
  GradeResult::from_bool(answers_match(user_input, expected))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_trim_and_case_insensitive() {
    assert_eq!(grade_typed_answer(" Hello ", "hello"), GradeResult::Correct);
    assert_eq!(grade_typed_answer("HELLO", "hello"), GradeResult::Correct);
    assert_eq!(grade_typed_answer("hello", "Hello"), GradeResult::Correct);
  }

  #[test]
  fn test_no_fuzzy_matching() {
    assert_eq!(grade_typed_answer("helo", "hello"), GradeResult::Incorrect);
    assert_eq!(grade_typed_answer("hello!", "hello"), GradeResult::Incorrect);
    assert_eq!(grade_typed_answer("thank", "thank you"), GradeResult::Incorrect);
  }

  #[test]
  fn test_inner_whitespace_is_significant() {
    assert_eq!(grade_typed_answer("thank  you", "thank you"), GradeResult::Incorrect);
    assert_eq!(grade_typed_answer("  thank you\t", "thank you"), GradeResult::Correct);
  }

  #[test]
  fn test_empty_input_is_incorrect() {
    assert_eq!(grade_typed_answer("", "hello"), GradeResult::Incorrect);
    assert_eq!(grade_typed_answer("   ", "hello"), GradeResult::Incorrect);
  }

  #[test]
  fn test_accents_are_significant() {
    assert_eq!(grade_typed_answer("adios", "adiós"), GradeResult::Incorrect);
    assert_eq!(grade_typed_answer("ADIÓS", "adiós"), GradeResult::Correct);
  }

  #[test]
  fn test_composed_and_decomposed_forms_match() {
    let composed = "adi\u{00f3}s";
    let decomposed = "adio\u{0301}s";
    assert_ne!(composed, decomposed);
    assert!(answers_match(decomposed, composed));
  }

  #[test]
  fn test_normalize_answer() {
    assert_eq!(normalize_answer("  Buenos Días "), "buenos días");
  }
}
