use serde::{Deserialize, Serialize};

use super::word::{Word, WordId};

/// Which side of a word is shown first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FrontSide {
  /// Source-language term is the prompt, translation is the answer
  #[default]
  Term,
  /// Translation is the prompt, term is the answer
  Translation,
}

impl FrontSide {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "term" | "source" => Some(Self::Term),
      "translation" | "target" => Some(Self::Translation),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Term => "term",
      Self::Translation => "translation",
    }
  }
}

/// A word as presented during one session round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCard {
  pub id: WordId,
  pub prompt: String,
  pub answer: String,
}

impl SessionCard {
  pub fn from_word(word: &Word, front_side: FrontSide) -> Self {
    let (prompt, answer) = match front_side {
      FrontSide::Term => (&word.term, &word.translation),
      FrontSide::Translation => (&word.translation, &word.term),
    };
    Self {
      id: word.id,
      prompt: prompt.clone(),
      answer: answer.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_front_side_from_str() {
    assert_eq!(FrontSide::from_str("term"), Some(FrontSide::Term));
    assert_eq!(FrontSide::from_str("source"), Some(FrontSide::Term));
    assert_eq!(FrontSide::from_str("translation"), Some(FrontSide::Translation));
    assert_eq!(FrontSide::from_str("target"), Some(FrontSide::Translation));
    assert_eq!(FrontSide::from_str("Term"), None);
  }

  #[test]
  fn test_front_side_default_is_term() {
    assert_eq!(FrontSide::default(), FrontSide::Term);
  }

  #[test]
  fn test_card_term_first() {
    let word = Word::new(1, "gracias", "thanks");
    let card = SessionCard::from_word(&word, FrontSide::Term);
    assert_eq!(card.id, 1);
    assert_eq!(card.prompt, "gracias");
    assert_eq!(card.answer, "thanks");
  }

  #[test]
  fn test_card_translation_first() {
    let word = Word::new(1, "gracias", "thanks");
    let card = SessionCard::from_word(&word, FrontSide::Translation);
    assert_eq!(card.prompt, "thanks");
    assert_eq!(card.answer, "gracias");
  }
}
