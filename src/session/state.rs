use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

use crate::models::{Session, SessionStatus, Snapshot, TrendPoint};
use crate::session::trend::TrendBuffer;

/// Mutable core of the live-session actor. Owned by the controller behind a
/// single mutex; the poll loop is the only other writer and re-checks the
/// status under the lock before committing anything.
#[derive(Debug, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// Monotonic reference for elapsed-time math; set once at start and kept
    /// across pause/resume so elapsed seconds stay relative to session start.
    pub start_anchor: Option<Instant>,
    pub current: Option<Snapshot>,
    pub trend: TrendBuffer,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter Active for a freshly begun session: fresh trend buffer, no
    /// current snapshot, elapsed-time reference anchored at `now`.
    pub fn begin(&mut self, session: &Session, now: Instant) {
        self.status = SessionStatus::Active;
        self.session_id = Some(session.id.clone());
        self.user_id = Some(session.user_id.clone());
        self.started_at = Some(session.started_at);
        self.start_anchor = Some(now);
        self.current = None;
        self.trend.clear();
    }

    /// Back to Idle, dropping everything session-scoped.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn feed(&self) -> LiveFeed {
        LiveFeed {
            snapshot: self.current.clone(),
            trend: self.trend.points(),
        }
    }
}

/// What live-feed subscribers see: the latest accepted snapshot plus the full
/// trend window, oldest first.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeed {
    pub snapshot: Option<Snapshot>,
    pub trend: Vec<TrendPoint>,
}
