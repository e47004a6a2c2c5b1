use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{HistoricalReading, Session, SessionStatus};
use crate::services::{HistoryStore, SessionService};

/// In-process session registry and history store.
///
/// Reference implementation of the external collaborators for the demo binary
/// and tests; sessions and readings live only for the process lifetime.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    sessions: Vec<Session>,
    readings: HashMap<String, Vec<HistoricalReading>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a past session directly, bypassing the live lifecycle.
    pub async fn insert_session(&self, session: Session) {
        let mut state = self.inner.lock().await;
        state.readings.entry(session.id.clone()).or_default();
        state.sessions.push(session);
    }

    pub async fn insert_reading(&self, reading: HistoricalReading) {
        let mut state = self.inner.lock().await;
        state
            .readings
            .entry(reading.session_id.clone())
            .or_default()
            .push(reading);
    }
}

#[async_trait]
impl SessionService for MemoryStore {
    async fn begin(&self, user_id: &str) -> CoreResult<Session> {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            status: SessionStatus::Active,
        };

        let mut state = self.inner.lock().await;
        state.readings.entry(session.id.clone()).or_default();
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn end(&self, session_id: &str) -> CoreResult<()> {
        let mut state = self.inner.lock().await;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| CoreError::Transport(format!("unknown session {session_id}")))?;

        session.ended_at = Some(Utc::now());
        session.status = SessionStatus::Idle;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn list_sessions(&self, user_id: &str, window_days: i64) -> CoreResult<Vec<Session>> {
        let cutoff = Utc::now() - Duration::days(window_days);
        let state = self.inner.lock().await;
        Ok(state
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.started_at >= cutoff)
            .cloned()
            .collect())
    }

    async fn list_readings(&self, session_id: &str) -> CoreResult<Vec<HistoricalReading>> {
        let state = self.inner.lock().await;
        state
            .readings
            .get(session_id)
            .cloned()
            .ok_or_else(|| CoreError::Transport(format!("unknown session {session_id}")))
    }
}
