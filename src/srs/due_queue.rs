//! Due-date bucketing for review words.
//!
//! Buckets are computed against a caller-supplied `now`, never a live clock.
//! The day boundary is the start of `now`'s local day, so the time zone of
//! `now` decides what "today" means.

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;

use crate::domain::Word;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "bucket", content = "days_until")]
pub enum DueBucket {
  Overdue,
  DueToday,
  Upcoming(i64),
}

impl DueBucket {
  /// True for buckets that belong in today's review set
  pub fn is_due(&self) -> bool {
    matches!(self, Self::Overdue | Self::DueToday)
  }
}

/// Counts per bucket for dashboards and badges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueSummary {
  pub overdue: usize,
  pub due_today: usize,
  pub upcoming: usize,
  /// Words with no (or an unreadable) due date
  pub unscheduled: usize,
}

impl DueSummary {
  pub fn due_total(&self) -> usize {
    self.overdue + self.due_today
  }
}

/// Midnight at the start of `now`'s local day, in UTC.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
  let local = now.naive_local();
  let midnight = local.date().and_time(NaiveTime::MIN);
  match now.timezone().from_local_datetime(&midnight).earliest() {
    Some(start) => start.with_timezone(&Utc),
    // Midnight skipped by a DST jump; fall back to wall-clock arithmetic
    None => now.with_timezone(&Utc) - (local - midnight),
  }
}

/// Whole days from the start of today until `due`, rounded toward negative infinity.
pub fn days_until<Tz: TimeZone>(due: DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
  let delta = due - start_of_day(now);
  // num_seconds truncates toward zero; floor it so sub-second gaps before midnight stay negative
  let mut seconds = delta.num_seconds();
  if delta < TimeDelta::seconds(seconds) {
    seconds -= 1;
  }
  seconds.div_euclid(SECONDS_PER_DAY)
}

/// Bucket a word against `now`. Words that are not scheduled yield None.
pub fn bucket<Tz: TimeZone>(word: &Word, now: &DateTime<Tz>) -> Option<DueBucket> {
  let Some(due) = word.due_at() else {
    if let Some(raw) = &word.next_review_due_at {
      tracing::debug!("Ignoring unreadable due date for word {}: {:?}", word.id, raw);
    }
    return None;
  };

  let days = days_until(due, now);
  Some(if days < 0 {
    DueBucket::Overdue
  } else if days == 0 {
    DueBucket::DueToday
  } else {
    DueBucket::Upcoming(days)
  })
}

/// Words that are overdue or due today, in input order.
pub fn due_today<'a, Tz: TimeZone>(words: &'a [Word], now: &DateTime<Tz>) -> Vec<&'a Word> {
  words
    .iter()
    .filter(|w| bucket(w, now).is_some_and(|b| b.is_due()))
    .collect()
}

pub fn due_today_count<Tz: TimeZone>(words: &[Word], now: &DateTime<Tz>) -> usize {
  due_today(words, now).len()
}

/// Single pass over `words` counting each bucket.
pub fn summarize<Tz: TimeZone>(words: &[Word], now: &DateTime<Tz>) -> DueSummary {
  let mut summary = DueSummary::default();
  for word in words {
    match bucket(word, now) {
      Some(DueBucket::Overdue) => summary.overdue += 1,
      Some(DueBucket::DueToday) => summary.due_today += 1,
      Some(DueBucket::Upcoming(_)) => summary.upcoming += 1,
      None => summary.unscheduled += 1,
    }
  }
  summary
}
