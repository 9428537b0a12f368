//! Application configuration.
//!
//! Values are resolved with priority: config.toml > environment (.env) > default.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::PathBuf;

// ==================== Defaults ====================

/// Default database location
pub const DEFAULT_DB_PATH: &str = "data/review.db";

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

/// Due counts at or above this are shown as "N+"
pub const BADGE_CAP: usize = 225;

/// Failed result writes kept for redelivery
pub const OUTBOX_CAPACITY: usize = 500;

// ==================== File structure ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseSection>,
    server: Option<ServerSection>,
    session: Option<SessionSection>,
    review: Option<ReviewSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct SessionSection {
    expiry_hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ReviewSection {
    badge_cap: Option<usize>,
    outbox_capacity: Option<usize>,
    utc_offset_minutes: Option<i32>,
}

// ==================== Resolved configuration ====================

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub server_addr: String,
    pub server_port: u16,
    pub session_expiry_hours: i64,
    pub badge_cap: usize,
    pub outbox_capacity: usize,
    /// Offset defining where "today" starts for due-date bucketing
    pub utc_offset: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            server_addr: SERVER_ADDR.to_string(),
            server_port: SERVER_PORT,
            session_expiry_hours: SESSION_EXPIRY_HOURS,
            badge_cap: BADGE_CAP,
            outbox_capacity: OUTBOX_CAPACITY,
            utc_offset: utc(),
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

impl Config {
    /// Load configuration from ./config.toml and the environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();
        let file = std::fs::read_to_string("config.toml").ok();
        Self::resolve(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Merge file contents and environment lookups over the defaults
    pub fn resolve(file_contents: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match file_contents.map(toml::from_str::<FileConfig>) {
            Some(Ok(parsed)) => parsed,
            Some(Err(e)) => {
                tracing::warn!("Ignoring unreadable config.toml: {}", e);
                FileConfig::default()
            }
            None => FileConfig::default(),
        };

        let mut config = Config::default();

        // Priority 2: environment
        if let Some(path) = env("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(addr) = env("SERVER_ADDR") {
            config.server_addr = addr;
        }
        if let Some(port) = env("PORT").and_then(|p| p.parse().ok()) {
            config.server_port = port;
        }
        if let Some(minutes) = env("REVIEW_UTC_OFFSET_MINUTES").and_then(|m| m.parse().ok()) {
            config.set_offset_minutes(minutes);
        }

        // Priority 1: config.toml
        if let Some(path) = file.database.and_then(|d| d.path) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(server) = file.server {
            if let Some(addr) = server.addr {
                config.server_addr = addr;
            }
            if let Some(port) = server.port {
                config.server_port = port;
            }
        }
        if let Some(hours) = file.session.and_then(|s| s.expiry_hours) {
            config.session_expiry_hours = hours;
        }
        if let Some(review) = file.review {
            if let Some(cap) = review.badge_cap {
                config.badge_cap = cap;
            }
            if let Some(capacity) = review.outbox_capacity {
                config.outbox_capacity = capacity;
            }
            if let Some(minutes) = review.utc_offset_minutes {
                config.set_offset_minutes(minutes);
            }
        }

        tracing::info!("Using database: {}", config.database_path.display());
        config
    }

    fn set_offset_minutes(&mut self, minutes: i32) {
        match minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
            Some(offset) => self.utc_offset = offset,
            None => tracing::warn!("Ignoring out-of-range UTC offset: {} minutes", minutes),
        }
    }

    /// Get the full server bind address
    pub fn server_bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

/// Render a due count for a badge, capping large values as "N+"
pub fn badge_label(count: usize, cap: usize) -> String {
    if count >= cap {
        format!("{}+", cap)
    } else {
        count.to_string()
    }
}
