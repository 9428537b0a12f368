//! Review session state machine.
//!
//! One `ReviewSession` drives a single round over a fixed deck:
//!
//! ```text
//! presenting --grade(correct)------------------> presenting | summarizing
//! presenting --grade(incorrect, flipped)-------> presenting | summarizing
//! presenting --grade(incorrect, not flipped)---> awaiting_retry_ack
//! awaiting_retry_ack --next--------------------> presenting | summarizing
//! summarizing --restart_with_incorrect---------> new session (presenting)
//! ```
//!
//! Every grade is reported once to the result recorder. Recorder failures are
//! logged and never hold up the session.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::clock::Clock;
use crate::db::LogOnError;
use crate::domain::{
  dedupe_by_id, dedupe_by_id_last, FrontSide, GradeResult, ResultEvent, ReviewEntry, SessionCard,
  StudyMode, Word, WordId,
};
use crate::recorder::ResultRecorder;
use crate::validation::grade_typed_answer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Presenting,
  AwaitingRetryAck,
  Summarizing,
}

impl Phase {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Presenting => "presenting",
      Self::AwaitingRetryAck => "awaiting_retry_ack",
      Self::Summarizing => "summarizing",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
  /// A session cannot start over zero cards
  EmptyDeck,
  InvalidPhase { expected: Phase, actual: Phase },
  CardMismatch { expected: WordId, got: WordId },
  WrongMode { expected: StudyMode, actual: StudyMode },
}

impl std::fmt::Display for SessionError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SessionError::EmptyDeck => write!(f, "No cards to review"),
      SessionError::InvalidPhase { expected, actual } => write!(
        f,
        "Action requires phase '{}' but session is '{}'",
        expected.as_str(),
        actual.as_str()
      ),
      SessionError::CardMismatch { expected, got } => {
        write!(f, "Graded card {} but current card is {}", got, expected)
      }
      SessionError::WrongMode { expected, actual } => write!(
        f,
        "Action requires {} mode but session is in {} mode",
        expected.as_str(),
        actual.as_str()
      ),
    }
  }
}

impl std::error::Error for SessionError {}

/// External collaborators a session reports to
#[derive(Clone)]
pub struct Collaborators {
  pub recorder: Arc<dyn ResultRecorder>,
  pub clock: Arc<dyn Clock>,
}

impl Collaborators {
  pub fn new(recorder: Arc<dyn ResultRecorder>, clock: Arc<dyn Clock>) -> Self {
    Self { recorder, clock }
  }
}

/// End-of-round results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
  pub correct_count: usize,
  pub incorrect_count: usize,
  pub percent_correct: u32,
  /// One entry per word, showing its latest outcome
  pub words: Vec<ReviewEntry>,
  /// Distinct words that would make up the retry deck
  pub retry_count: usize,
  pub can_retry: bool,
}

#[derive(Clone)]
pub struct ReviewSession {
  mode: StudyMode,
  front_side: FrontSide,
  round: u32,
  words: Vec<Word>,
  deck: Vec<SessionCard>,
  cursor: usize,
  is_flipped: bool,
  pending_answer: String,
  /// Every grade in order; correct/incorrect logs are views over this
  log: Vec<ReviewEntry>,
  phase: Phase,
  collaborators: Collaborators,
}

impl std::fmt::Debug for ReviewSession {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ReviewSession")
      .field("mode", &self.mode)
      .field("front_side", &self.front_side)
      .field("round", &self.round)
      .field("cursor", &self.cursor)
      .field("deck_len", &self.deck.len())
      .field("phase", &self.phase)
      .finish_non_exhaustive()
  }
}

impl ReviewSession {
  /// Start a session over `words`. Duplicate ids keep their first occurrence.
  pub fn start(
    words: &[Word],
    mode: StudyMode,
    front_side: FrontSide,
    collaborators: Collaborators,
  ) -> Result<Self, SessionError> {
    Self::start_round(words.to_vec(), mode, front_side, collaborators, 1)
  }

  fn start_round(
    words: Vec<Word>,
    mode: StudyMode,
    front_side: FrontSide,
    collaborators: Collaborators,
    round: u32,
  ) -> Result<Self, SessionError> {
    let total = words.len();
    let words = dedupe_by_id(words, |w| w.id);
    if words.len() < total {
      tracing::warn!("Dropped {} duplicate words from session deck", total - words.len());
    }
    if words.is_empty() {
      return Err(SessionError::EmptyDeck);
    }

    let deck = words
      .iter()
      .map(|w| SessionCard::from_word(w, front_side))
      .collect::<Vec<_>>();

    tracing::debug!(
      "Starting {} round {} with {} cards ({} first)",
      mode.as_str(),
      round,
      deck.len(),
      front_side.as_str()
    );

    Ok(Self {
      mode,
      front_side,
      round,
      words,
      deck,
      cursor: 0,
      is_flipped: false,
      pending_answer: String::new(),
      log: Vec::new(),
      phase: Phase::Presenting,
      collaborators,
    })
  }

  pub fn mode(&self) -> StudyMode {
    self.mode
  }

  pub fn front_side(&self) -> FrontSide {
    self.front_side
  }

  pub fn round(&self) -> u32 {
    self.round
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn deck(&self) -> &[SessionCard] {
    &self.deck
  }

  pub fn is_flipped(&self) -> bool {
    self.is_flipped
  }

  pub fn pending_answer(&self) -> &str {
    &self.pending_answer
  }

  /// Card being shown, None once the round is summarizing
  pub fn current_card(&self) -> Option<&SessionCard> {
    match self.phase {
      Phase::Summarizing => None,
      _ => self.deck.get(self.cursor),
    }
  }

  /// (completed, total) for progress display
  pub fn progress(&self) -> (usize, usize) {
    (self.cursor, self.deck.len())
  }

  pub fn log(&self) -> &[ReviewEntry] {
    &self.log
  }

  pub fn correct_log(&self) -> impl Iterator<Item = &ReviewEntry> {
    self.log.iter().filter(|e| e.was_correct)
  }

  pub fn incorrect_log(&self) -> impl Iterator<Item = &ReviewEntry> {
    self.log.iter().filter(|e| !e.was_correct)
  }

  /// Toggle the current card. Ignored unless a card is being presented.
  pub fn flip(&mut self) -> bool {
    if self.phase == Phase::Presenting {
      self.is_flipped = !self.is_flipped;
    }
    self.is_flipped
  }

  /// Update the in-progress typed answer
  pub fn set_pending_answer(&mut self, text: &str) {
    if self.phase == Phase::Presenting {
      self.pending_answer = text.to_string();
    }
  }

  /// Record a self-assessed grade for the current card (flashcard mode).
  pub fn grade(
    &mut self,
    card_id: WordId,
    result: GradeResult,
    was_flipped: bool,
  ) -> Result<Phase, SessionError> {
    // Writing mode is graded from the typed answer only
    if self.mode != StudyMode::Flashcard {
      return Err(SessionError::WrongMode {
        expected: StudyMode::Flashcard,
        actual: self.mode,
      });
    }
    self.record_grade(card_id, result, was_flipped)
  }

  fn record_grade(
    &mut self,
    card_id: WordId,
    result: GradeResult,
    was_flipped: bool,
  ) -> Result<Phase, SessionError> {
    self.expect_phase(Phase::Presenting)?;
    let card = &self.deck[self.cursor];
    if card.id != card_id {
      return Err(SessionError::CardMismatch {
        expected: card.id,
        got: card_id,
      });
    }

    let was_correct = result.is_correct();
    self.log.push(ReviewEntry {
      id: card.id,
      prompt: card.prompt.clone(),
      answer: card.answer.clone(),
      was_correct,
    });
    self.notify_recorder(card_id, was_correct);

    if was_correct || was_flipped {
      self.advance();
    } else {
      self.phase = Phase::AwaitingRetryAck;
    }
    Ok(self.phase)
  }

  /// Grade the current card using the session's own flip state
  pub fn answer(&mut self, result: GradeResult) -> Result<Phase, SessionError> {
    let card_id = self.current_id()?;
    let was_flipped = self.is_flipped;
    self.grade(card_id, result, was_flipped)
  }

  /// Grade the pending typed answer (writing mode).
  ///
  /// Typed answers never count as flipped, so a miss always stops on the
  /// correct answer before moving on.
  pub fn submit_answer(&mut self) -> Result<Phase, SessionError> {
    if self.mode != StudyMode::Writing {
      return Err(SessionError::WrongMode {
        expected: StudyMode::Writing,
        actual: self.mode,
      });
    }
    let card_id = self.current_id()?;
    let result = grade_typed_answer(&self.pending_answer, &self.deck[self.cursor].answer);
    self.record_grade(card_id, result, false)
  }

  /// Acknowledge a missed card and move on
  pub fn next(&mut self) -> Result<Phase, SessionError> {
    self.expect_phase(Phase::AwaitingRetryAck)?;
    self.advance();
    Ok(self.phase)
  }

  fn advance(&mut self) {
    self.cursor += 1;
    self.is_flipped = false;
    self.pending_answer.clear();
    if self.cursor >= self.deck.len() {
      self.cursor = self.deck.len();
      self.phase = Phase::Summarizing;
      tracing::debug!(
        "Round {} finished: {}% correct",
        self.round,
        self.percent_correct()
      );
    } else {
      self.phase = Phase::Presenting;
    }
  }

  pub fn percent_correct(&self) -> u32 {
    let total = self.log.len();
    if total == 0 {
      return 0;
    }
    let correct = self.correct_log().count();
    (100.0 * correct as f64 / total as f64).round() as u32
  }

  /// Cards answered incorrectly at least once this round, first miss first
  pub fn retry_deck(&self) -> Vec<SessionCard> {
    dedupe_by_id(self.incorrect_log(), |e| e.id)
      .into_iter()
      .map(|e| SessionCard {
        id: e.id,
        prompt: e.prompt.clone(),
        answer: e.answer.clone(),
      })
      .collect()
  }

  pub fn summary(&self) -> Option<SessionSummary> {
    if self.phase != Phase::Summarizing {
      return None;
    }
    let retry_count = self.retry_deck().len();
    Some(SessionSummary {
      correct_count: self.correct_log().count(),
      incorrect_count: self.incorrect_log().count(),
      percent_correct: self.percent_correct(),
      words: dedupe_by_id_last(self.log.iter().cloned(), |e| e.id),
      retry_count,
      can_retry: retry_count > 0,
    })
  }

  /// New round over the cards missed in this one.
  pub fn restart_with_incorrect(&self) -> Result<Self, SessionError> {
    self.expect_phase(Phase::Summarizing)?;
    let missed: HashSet<WordId> = self.incorrect_log().map(|e| e.id).collect();
    if missed.is_empty() {
      return Err(SessionError::EmptyDeck);
    }

    let retry_deck = self.retry_deck();
    let mut session = Self::start_round(
      self.words_for(&missed),
      self.mode,
      self.front_side,
      self.collaborators.clone(),
      self.round + 1,
    )?;
    // Keep the order in which cards were first missed
    session.deck = retry_deck;
    Ok(session)
  }

  /// Discard progress and start over with a new mode or front side
  pub fn reconfigure(&self, mode: StudyMode, front_side: FrontSide) -> Result<Self, SessionError> {
    Self::start_round(
      self.words.clone(),
      mode,
      front_side,
      self.collaborators.clone(),
      1,
    )
  }

  /// Tear the session down, handing back the summary if the round finished
  pub fn exit(self) -> Option<SessionSummary> {
    tracing::debug!(
      "Exiting {} session at card {}/{}",
      self.mode.as_str(),
      self.cursor,
      self.deck.len()
    );
    self.summary()
  }

  fn words_for(&self, ids: &HashSet<WordId>) -> Vec<Word> {
    self
      .words
      .iter()
      .filter(|w| ids.contains(&w.id))
      .cloned()
      .collect()
  }

  fn current_id(&self) -> Result<WordId, SessionError> {
    self.expect_phase(Phase::Presenting)?;
    Ok(self.deck[self.cursor].id)
  }

  fn expect_phase(&self, expected: Phase) -> Result<(), SessionError> {
    if self.phase == expected {
      Ok(())
    } else {
      Err(SessionError::InvalidPhase {
        expected,
        actual: self.phase,
      })
    }
  }

  fn notify_recorder(&self, word_id: WordId, was_correct: bool) {
    let event = ResultEvent::new(
      word_id,
      self.mode.test_type(),
      was_correct,
      self.collaborators.clock.now(),
    );
    self
      .collaborators
      .recorder
      .record(&event)
      .log_warn(&format!("Failed to record result for word {}", word_id));
  }
}
