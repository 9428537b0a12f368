pub mod due_queue;
pub mod memory_match;
pub mod review_session;

pub use due_queue::{bucket, due_today, due_today_count, summarize, DueBucket, DueSummary};
pub use memory_match::{MatchGame, MatchOutcome};
pub use review_session::{Collaborators, Phase, ReviewSession, SessionError, SessionSummary};
