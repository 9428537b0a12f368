//! Pair-matching exercise: a column of terms and a shuffled column of
//! translations; the player picks one tile from each side to match them up.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::domain::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
  Term,
  Translation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
  pub id: usize,
  pub text: String,
  pub column: Column,
  /// Index of the pair this tile belongs to
  pub pair: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
  /// Tile already matched, already selected, or unknown
  Ignored,
  /// First tile of a pair attempt
  Selected,
  Matched,
  /// Selection cleared
  Mismatch,
  /// Final pair matched
  Completed,
}

#[derive(Debug, Clone)]
pub struct MatchGame {
  tiles: Vec<Tile>,
  selected: Option<usize>,
  matched: HashSet<usize>,
  pair_count: usize,
  completed: bool,
}

impl MatchGame {
  pub fn new(words: &[Word]) -> Self {
    Self::with_rng(words, &mut rand::rng())
  }

  /// Build a game, shuffling the translation column with `rng`
  pub fn with_rng<R: Rng + ?Sized>(words: &[Word], rng: &mut R) -> Self {
    let mut tiles: Vec<Tile> = words
      .iter()
      .enumerate()
      .map(|(pair, w)| Tile {
        id: pair,
        text: w.term.clone(),
        column: Column::Term,
        pair,
      })
      .collect();

    let mut translations: Vec<(usize, String)> = words
      .iter()
      .enumerate()
      .map(|(pair, w)| (pair, w.translation.clone()))
      .collect();
    translations.shuffle(rng);

    let offset = tiles.len();
    tiles.extend(translations.into_iter().enumerate().map(|(i, (pair, text))| Tile {
      id: offset + i,
      text,
      column: Column::Translation,
      pair,
    }));

    Self {
      tiles,
      selected: None,
      matched: HashSet::new(),
      pair_count: words.len(),
      completed: false,
    }
  }

  pub fn tiles(&self) -> &[Tile] {
    &self.tiles
  }

  pub fn column(&self, column: Column) -> impl Iterator<Item = &Tile> {
    self.tiles.iter().filter(move |t| t.column == column)
  }

  pub fn selected(&self) -> Option<usize> {
    self.selected
  }

  pub fn is_matched(&self, tile_id: usize) -> bool {
    self
      .tiles
      .get(tile_id)
      .is_some_and(|t| self.matched.contains(&t.pair))
  }

  pub fn matched_pairs(&self) -> usize {
    self.matched.len()
  }

  pub fn is_complete(&self) -> bool {
    self.pair_count > 0 && self.matched.len() == self.pair_count
  }

  pub fn select(&mut self, tile_id: usize) -> MatchOutcome {
    let Some(tile) = self.tiles.get(tile_id) else {
      return MatchOutcome::Ignored;
    };
    if self.matched.contains(&tile.pair) || self.selected == Some(tile_id) {
      return MatchOutcome::Ignored;
    }

    let Some(first_id) = self.selected.take() else {
      self.selected = Some(tile_id);
      return MatchOutcome::Selected;
    };

    let first = &self.tiles[first_id];
    if first.pair != tile.pair || first.column == tile.column {
      return MatchOutcome::Mismatch;
    }

    self.matched.insert(tile.pair);
    if self.is_complete() && !self.completed {
      self.completed = true;
      tracing::debug!("Memory match completed with {} pairs", self.pair_count);
      return MatchOutcome::Completed;
    }
    MatchOutcome::Matched
  }
}
