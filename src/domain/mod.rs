pub mod card;
pub mod review;
pub mod word;

pub use card::{FrontSide, SessionCard};
pub use review::{GradeResult, ResultEvent, ReviewEntry, StudyMode, TestType};
pub use word::{Word, WordId, WordStatus};

use std::collections::{HashMap, HashSet};

/// Keep the first item seen for each id, preserving order.
pub fn dedupe_by_id<T, F>(items: impl IntoIterator<Item = T>, id_of: F) -> Vec<T>
where
  F: Fn(&T) -> WordId,
{
  let mut seen = HashSet::new();
  items.into_iter().filter(|item| seen.insert(id_of(item))).collect()
}

/// Keep the last item seen for each id, positioned where the id first appeared.
pub fn dedupe_by_id_last<T, F>(items: impl IntoIterator<Item = T>, id_of: F) -> Vec<T>
where
  F: Fn(&T) -> WordId,
{
  let mut order: Vec<T> = Vec::new();
  let mut index = HashMap::new();
  for item in items {
    let id = id_of(&item);
    match index.get(&id) {
      Some(&pos) => order[pos] = item,
      None => {
        index.insert(id, order.len());
        order.push(item);
      }
    }
  }
  order
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_dedupe_first_wins() {
    let items = vec![(1, "a"), (2, "b"), (1, "c"), (3, "d"), (2, "e")];
    let deduped = dedupe_by_id(items, |(id, _)| *id);
    assert_eq!(deduped, vec![(1, "a"), (2, "b"), (3, "d")]);
  }

  #[test]
  fn test_dedupe_last_wins_keeps_first_position() {
    let items = vec![(1, "a"), (2, "b"), (1, "c"), (3, "d"), (2, "e")];
    let deduped = dedupe_by_id_last(items, |(id, _)| *id);
    assert_eq!(deduped, vec![(1, "c"), (2, "e"), (3, "d")]);
  }

  #[test]
  fn test_dedupe_empty() {
    let items: Vec<(WordId, &str)> = vec![];
    assert!(dedupe_by_id(items.clone(), |(id, _)| *id).is_empty());
    assert!(dedupe_by_id_last(items, |(id, _)| *id).is_empty());
  }
}
