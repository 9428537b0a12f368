//! Test utilities: temporary databases and in-memory collaborators.

use chrono::{TimeZone, Utc};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::clock::FixedClock;
use crate::db::{self, DbPool};
use crate::domain::{ResultEvent, Word, WordId, WordStatus};
use crate::recorder::{RecordError, ResultRecorder};
use crate::srs::Collaborators;

/// Test environment with a migrated on-disk database.
///
/// The database lives in a temporary directory that is removed on drop.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Direct connection for assertions
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let conn = Connection::open(temp.path().join("review.db"))?;
        db::run_migrations(&conn)?;
        Ok(Self { temp, conn })
    }

    /// Environment pre-populated with `words`
    pub fn with_words(words: &[Word]) -> rusqlite::Result<Self> {
        let env = Self::new()?;
        for word in words {
            db::upsert_word(&env.conn, word)?;
        }
        Ok(env)
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp.path().join("review.db")
    }

    /// Second connection to the same database, shaped like the app's pool
    pub fn pool(&self) -> DbPool {
        db::init_db(&self.db_path()).expect("Failed to open test database")
    }
}

/// Recorder that keeps events in memory and can be told to fail
#[derive(Default)]
pub struct MemoryRecorder {
    events: Mutex<Vec<ResultEvent>>,
    failing: AtomicBool,
    rejected_words: Mutex<Vec<WordId>>,
    attempts: AtomicUsize,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Permanently refuse results for `word_id`
    pub fn reject_word(&self, word_id: WordId) {
        self.rejected_words.lock().expect("recorder lock").push(word_id);
    }

    pub fn events(&self) -> Vec<ResultEvent> {
        self.events.lock().expect("recorder lock").clone()
    }

    /// Calls to `record`, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ResultRecorder for MemoryRecorder {
    fn record(&self, event: &ResultEvent) -> Result<(), RecordError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RecordError::Unavailable("simulated outage".to_string()));
        }
        if self.rejected_words.lock().expect("recorder lock").contains(&event.word_id) {
            return Err(RecordError::Rejected(format!("unknown word {}", event.word_id)));
        }
        self.events.lock().expect("recorder lock").push(event.clone());
        Ok(())
    }
}

/// Collaborators with `recorder` and a clock pinned to 2024-01-10 09:00 UTC
pub fn collaborators(recorder: Arc<MemoryRecorder>) -> Collaborators {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
    Collaborators::new(recorder, Arc::new(clock))
}

/// Small vocabulary with a mix of due dates, relative to 2024-01-10
pub fn sample_words() -> Vec<Word> {
    vec![
        Word::new(1, "hola", "hello")
            .with_due("2024-01-08T00:00:00Z")
            .with_status(WordStatus::Learning),
        Word::new(2, "adiós", "goodbye")
            .with_due("2024-01-10T06:00:00Z")
            .with_status(WordStatus::Learning),
        Word::new(3, "gracias", "thank you")
            .with_due("2024-01-12T00:00:00Z")
            .with_status(WordStatus::Learning),
        Word::new(4, "por favor", "please"),
        Word::new(5, "buenos días", "good morning")
            .with_due("2024-01-09T18:00:00Z")
            .with_status(WordStatus::Known),
        Word::new(6, "de nada", "you're welcome").with_due("not-a-date"),
    ]
}
