//! thinknotes library - application state, router and module re-exports.
//!
//! The binary in `main.rs` only loads configuration, sets up logging and
//! serves [`router`]; everything else lives here so integration tests can
//! drive the full application.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

use chrono::{DateTime, Utc};

pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notes;
pub mod store;
pub mod templates;
pub mod thinkable;

// ============================================================================
// Rate Limiting
// ============================================================================

/// Tracks login failures for rate limiting with exponential backoff.
pub struct LoginRateLimit {
    pub failures: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl LoginRateLimit {
    pub fn new() -> Self {
        Self {
            failures: 0,
            locked_until: None,
        }
    }

    /// Check if login attempts are currently locked out.
    pub fn is_locked(&self) -> bool {
        if let Some(until) = self.locked_until {
            Utc::now() < until
        } else {
            false
        }
    }

    /// Record a failed login attempt. After 5 failures, apply exponential backoff capped at 64s.
    pub fn record_failure(&mut self) {
        self.failures += 1;
        if self.failures >= 5 {
            let shift = (self.failures - 5).min(6);
            let delay_secs = std::cmp::min(1i64 << shift, 64);
            self.locked_until = Some(Utc::now() + chrono::Duration::seconds(delay_secs));
            tracing::warn!(failures = self.failures, delay_secs, "login locked out");
        }
    }

    /// Reset on successful login.
    pub fn reset(&mut self) {
        self.failures = 0;
        self.locked_until = None;
    }
}

impl Default for LoginRateLimit {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub config: config::Config,
    pub store: store::Store,
    pub ai: ai::AiClient,
    pub session_secret: Vec<u8>,
    pub login_rate_limit: Mutex<LoginRateLimit>,
}

impl AppState {
    /// Open the on-disk store named by `config`.
    pub fn open(config: config::Config) -> error::Result<Self> {
        let store = store::Store::open(&config.db_path)?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: config::Config, store: store::Store) -> Self {
        let session_secret = match config.session_secret {
            Some(ref s) => s.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "THINKNOTES_SESSION_SECRET not set; sessions will not survive a restart"
                );
                auth::random_secret()
            }
        };

        Self {
            ai: ai::AiClient::new(&config.ai),
            config,
            store,
            session_secret,
            login_rate_limit: Mutex::new(LoginRateLimit::new()),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        // Accounts
        .route("/register", get(handlers::register_page).post(handlers::register_submit))
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/logout", get(handlers::logout))
        // Notes
        .route("/dashboard", get(handlers::dashboard))
        .route("/notes", get(handlers::notes_index))
        .route("/notes/new", get(handlers::new_note_page).post(handlers::create_note))
        .route("/notes/{id}", get(handlers::view_note))
        .route("/notes/{id}/edit", get(handlers::edit_note_page).post(handlers::update_note))
        .route("/notes/{id}/delete", post(handlers::delete_note))
        .route("/notes/{id}/summary", post(handlers::generate_summary))
        // Browsing
        .route("/search", get(handlers::search))
        .route("/tags", get(handlers::tags))
        .route("/tags/{tag}", get(handlers::tag_notes))
        // AI
        .route("/api/suggest-tags", post(handlers::suggest_tags))
        .route("/api/ai/status", get(handlers::ai_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub use models::{Note, NoteDraft, SearchMatch, SearchResult, TagCount, User};
pub use thinkable::{segment, Segment, SegmentKind, ThinkableView, ThoughtState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_locks_after_five_failures() {
        let mut limit = LoginRateLimit::new();
        for _ in 0..4 {
            limit.record_failure();
        }
        assert!(!limit.is_locked());
        limit.record_failure();
        assert!(limit.is_locked());
        limit.reset();
        assert!(!limit.is_locked());
        assert_eq!(limit.failures, 0);
    }
}
