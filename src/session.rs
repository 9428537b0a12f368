//! Simple in-memory storage for review sessions.
//!
//! Stores ReviewSession state keyed by session ID (from cookie).
//! Sessions auto-expire after a configurable duration of inactivity.

use crate::config;
use crate::srs::ReviewSession;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Session entry with last access time for expiration
struct SessionEntry {
  session: ReviewSession,
  last_access: DateTime<Utc>,
}

pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
  expiry: Duration,
}

impl SessionStore {
  pub fn new(expiry_hours: i64) -> Self {
    Self {
      sessions: Mutex::new(HashMap::new()),
      expiry: Duration::hours(expiry_hours),
    }
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Store (or replace) the session for `session_id`
  pub fn insert(&self, session_id: &str, session: ReviewSession) {
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      self.cleanup_expired(&mut sessions);
    }

    sessions.insert(
      session_id.to_string(),
      SessionEntry {
        session,
        last_access: Utc::now(),
      },
    );
  }

  /// Run `f` against a live session, refreshing its access time
  pub fn with_session<R>(&self, session_id: &str, f: impl FnOnce(&mut ReviewSession) -> R) -> Option<R> {
    let mut sessions = self.lock();
    let entry = sessions.get_mut(session_id)?;
    if Utc::now() - entry.last_access > self.expiry {
      sessions.remove(session_id);
      return None;
    }
    entry.last_access = Utc::now();
    Some(f(&mut entry.session))
  }

  pub fn get(&self, session_id: &str) -> Option<ReviewSession> {
    self.with_session(session_id, |s| s.clone())
  }

  pub fn remove(&self, session_id: &str) -> Option<ReviewSession> {
    self.lock().remove(session_id).map(|entry| entry.session)
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Clean up expired sessions
  fn cleanup_expired(&self, sessions: &mut HashMap<String, SessionEntry>) {
    let expiry = Utc::now() - self.expiry;
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_access > expiry);
    if sessions.len() < before {
      tracing::debug!("Expired {} review sessions", before - sessions.len());
    }
  }
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}
