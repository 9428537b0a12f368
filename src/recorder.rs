//! Result recording for graded cards.
//!
//! The review session hands every grade to a [`ResultRecorder`] and never
//! waits on the outcome. [`OutboxRecorder`] wraps a recorder and keeps failed
//! events queued until they can be delivered.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::domain::ResultEvent;

pub trait ResultRecorder: Send + Sync {
  fn record(&self, event: &ResultEvent) -> Result<(), RecordError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
  /// Backend could not be reached (lock poisoned, connection gone)
  Unavailable(String),
  /// Backend refused the write
  Rejected(String),
}

impl std::fmt::Display for RecordError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RecordError::Unavailable(msg) => write!(f, "Result recorder unavailable: {}", msg),
      RecordError::Rejected(msg) => write!(f, "Result rejected: {}", msg),
    }
  }
}

impl std::error::Error for RecordError {}

/// At-least-once delivery on top of a best-effort recorder.
///
/// Events the inner recorder could not reach are queued in arrival order.
/// Every later `record` call first retries the backlog, so results reach the
/// inner recorder in the order they were graded. Rejected events are logged
/// and dropped. When the queue is full the oldest event is dropped.
pub struct OutboxRecorder<R> {
  inner: R,
  pending: Mutex<VecDeque<ResultEvent>>,
  capacity: usize,
}

impl<R: ResultRecorder> OutboxRecorder<R> {
  pub fn new(inner: R, capacity: usize) -> Self {
    Self {
      inner,
      pending: Mutex::new(VecDeque::new()),
      capacity: capacity.max(1),
    }
  }

  pub fn inner(&self) -> &R {
    &self.inner
  }

  pub fn pending_len(&self) -> usize {
    self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  /// Retry queued events. Returns how many were delivered.
  pub fn flush(&self) -> usize {
    let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
    self.drain(&mut pending)
  }

  fn drain(&self, pending: &mut VecDeque<ResultEvent>) -> usize {
    let mut delivered = 0;
    while let Some(event) = pending.front() {
      match self.inner.record(event) {
        Ok(()) => {
          pending.pop_front();
          delivered += 1;
        }
        Err(RecordError::Rejected(e)) => {
          tracing::warn!("Dropping queued result for word {}: {}", event.word_id, e);
          pending.pop_front();
        }
        Err(e) => {
          tracing::debug!("Outbox still blocked ({} pending): {}", pending.len(), e);
          break;
        }
      }
    }
    if delivered > 0 {
      tracing::info!("Delivered {} queued review results", delivered);
    }
    delivered
  }

  fn enqueue(&self, pending: &mut VecDeque<ResultEvent>, event: ResultEvent) {
    if pending.len() >= self.capacity {
      if let Some(dropped) = pending.pop_front() {
        tracing::warn!(
          "Outbox full ({}), dropping result for word {}",
          self.capacity,
          dropped.word_id
        );
      }
    }
    pending.push_back(event);
  }
}

impl<R: ResultRecorder> ResultRecorder for OutboxRecorder<R> {
  fn record(&self, event: &ResultEvent) -> Result<(), RecordError> {
    let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

    self.drain(&mut pending);
    if !pending.is_empty() {
      self.enqueue(&mut pending, event.clone());
      return Ok(());
    }

    match self.inner.record(event) {
      Ok(()) => {}
      // Retrying a rejected write cannot succeed
      Err(RecordError::Rejected(e)) => {
        tracing::warn!("Dropping result for word {}: {}", event.word_id, e);
      }
      Err(e) => {
        tracing::warn!("Queueing result for word {} after failure: {}", event.word_id, e);
        self.enqueue(&mut pending, event.clone());
      }
    }
    Ok(())
  }
}
