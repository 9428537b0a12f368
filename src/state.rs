//! Application state shared by all handlers.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::{DbPool, SqliteRecorder, SqliteWordSource};
use crate::recorder::OutboxRecorder;
use crate::session::SessionStore;
use crate::srs::Collaborators;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,

    /// Word source backing new sessions and the due summary
    pub words: SqliteWordSource,

    /// Result writes go through the outbox so failed writes are retried
    pub recorder: Arc<OutboxRecorder<SqliteRecorder>>,

    pub clock: Arc<dyn Clock>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self::with_clock(pool, config, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: DbPool, config: Config, clock: Arc<dyn Clock>) -> Self {
        let recorder = OutboxRecorder::new(SqliteRecorder::new(pool.clone()), config.outbox_capacity);
        Self {
            words: SqliteWordSource::new(pool.clone()),
            recorder: Arc::new(recorder),
            sessions: Arc::new(SessionStore::new(config.session_expiry_hours)),
            config: Arc::new(config),
            clock,
            pool,
        }
    }

    /// Recorder and clock handed to each new review session
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(self.recorder.clone(), self.clock.clone())
    }
}
