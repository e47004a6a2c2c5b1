use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::time::Instant;

use crate::error::{CoreError, CoreResult};
use crate::models::SessionStatus;
use crate::polling::{PollContext, PollerController};
use crate::services::{SessionService, SnapshotSource};
use crate::session::state::{LiveFeed, SessionState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_warn};

/// Outcome of `stop`: the transition to Idle always happens; a failed
/// session-end call against the external service rides along instead of
/// blocking it.
#[derive(Debug)]
pub struct StopReport {
    pub status: SessionStatus,
    pub end_error: Option<CoreError>,
}

/// Live-session actor handle. One controller drives at most one session;
/// clones share the same state, poller and subscription channels.
///
/// Transitions are serialized on the poller lock (every transition takes it
/// for its full duration), while the poll loop touches only the state lock —
/// so a transition joining the poll task can never deadlock against an
/// in-flight tick.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    sessions: Arc<dyn SessionService>,
    source: Arc<dyn SnapshotSource>,
    poller: Arc<Mutex<PollerController>>,
    status_tx: Arc<watch::Sender<SessionStatus>>,
    feed_tx: Arc<watch::Sender<LiveFeed>>,
}

impl SessionController {
    pub fn new(sessions: Arc<dyn SessionService>, source: Arc<dyn SnapshotSource>) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Idle);
        let (feed_tx, _) = watch::channel(LiveFeed::default());

        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            sessions,
            source,
            poller: Arc::new(Mutex::new(PollerController::new())),
            status_tx: Arc::new(status_tx),
            feed_tx: Arc::new(feed_tx),
        }
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    /// Latest accepted snapshot plus the current trend window.
    pub async fn live_feed(&self) -> LiveFeed {
        self.state.lock().await.feed()
    }

    pub async fn session_id(&self) -> Option<String> {
        self.state.lock().await.session_id.clone()
    }

    /// Status updates as they happen: one value per transition.
    pub fn subscribe_status(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    /// Live feed updates: one value per accepted snapshot and per clearing
    /// transition.
    pub fn subscribe_feed(&self) -> watch::Receiver<LiveFeed> {
        self.feed_tx.subscribe()
    }

    /// Begin a session for `user_id`. Valid only from Idle; on success the
    /// controller is Active with an empty trend buffer and the poller running.
    /// On failure nothing is retained.
    pub async fn start(&self, user_id: &str) -> CoreResult<SessionStatus> {
        let mut poller = self.poller.lock().await;

        {
            let state = self.state.lock().await;
            if state.status != SessionStatus::Idle {
                return Err(CoreError::InvalidTransition {
                    action: "start",
                    from: state.status,
                });
            }
        }

        let session = self
            .sessions
            .begin(user_id)
            .await
            .map_err(|err| CoreError::SessionStart(err.to_string()))?;

        let anchor = Instant::now();
        {
            let mut state = self.state.lock().await;
            state.begin(&session, anchor);
        }

        if let Err(err) = poller.start_polling(self.poll_context(&session.id, anchor)) {
            // Roll back so a failed start leaves no partial state behind.
            self.state.lock().await.reset();
            if let Err(end_err) = self.sessions.end(&session.id).await {
                log_warn!("failed to end session {} after aborted start: {end_err}", session.id);
            }
            return Err(CoreError::SessionStart(err.to_string()));
        }

        self.publish_status(SessionStatus::Active);
        self.publish_feed().await;
        Ok(SessionStatus::Active)
    }

    /// Suspend polling. Valid only from Active; the trend buffer and current
    /// snapshot are retained. No tick fires after this returns.
    pub async fn pause(&self) -> CoreResult<SessionStatus> {
        let mut poller = self.poller.lock().await;

        {
            let mut state = self.state.lock().await;
            if state.status != SessionStatus::Active {
                return Err(CoreError::InvalidTransition {
                    action: "pause",
                    from: state.status,
                });
            }
            // Flip first so a tick mid-fetch discards its sample.
            state.status = SessionStatus::Paused;
        }

        if let Err(err) = poller.stop_polling().await {
            log_error!("poll loop failed to join on pause: {err:?}");
        }

        self.publish_status(SessionStatus::Paused);
        Ok(SessionStatus::Paused)
    }

    /// Resume polling from Paused. The elapsed-time reference stays at the
    /// original session start.
    pub async fn resume(&self) -> CoreResult<SessionStatus> {
        let mut poller = self.poller.lock().await;

        let (session_id, anchor) = {
            let mut state = self.state.lock().await;
            if state.status != SessionStatus::Paused {
                return Err(CoreError::InvalidTransition {
                    action: "resume",
                    from: state.status,
                });
            }

            match (state.session_id.clone(), state.start_anchor) {
                (Some(id), Some(anchor)) => {
                    state.status = SessionStatus::Active;
                    (id, anchor)
                }
                _ => {
                    return Err(CoreError::InvalidTransition {
                        action: "resume",
                        from: state.status,
                    })
                }
            }
        };

        if let Err(err) = poller.start_polling(self.poll_context(&session_id, anchor)) {
            self.state.lock().await.status = SessionStatus::Paused;
            return Err(CoreError::SessionStart(err.to_string()));
        }

        self.publish_status(SessionStatus::Active);
        Ok(SessionStatus::Active)
    }

    /// End the session. Valid from Active or Paused. The external end call is
    /// best-effort: its failure is reported in the `StopReport` but the
    /// controller still lands in Idle with the trend buffer and current
    /// snapshot cleared, and no tick fires after this returns.
    pub async fn stop(&self) -> CoreResult<StopReport> {
        let mut poller = self.poller.lock().await;

        let session_id = {
            let mut state = self.state.lock().await;
            if state.status == SessionStatus::Idle {
                return Err(CoreError::InvalidTransition {
                    action: "stop",
                    from: state.status,
                });
            }
            // Flip first so a tick mid-fetch discards its sample.
            state.status = SessionStatus::Idle;
            state.session_id.clone()
        };

        if let Err(err) = poller.stop_polling().await {
            log_error!("poll loop failed to join on stop: {err:?}");
        }

        let end_error = match &session_id {
            Some(id) => match self.sessions.end(id).await {
                Ok(()) => None,
                Err(err) => {
                    log_warn!("session end call failed for {id}: {err}");
                    Some(err)
                }
            },
            None => None,
        };

        self.state.lock().await.reset();

        self.publish_status(SessionStatus::Idle);
        self.publish_feed().await;

        Ok(StopReport {
            status: SessionStatus::Idle,
            end_error,
        })
    }

    fn poll_context(&self, session_id: &str, start_anchor: Instant) -> PollContext {
        PollContext {
            session_id: session_id.to_string(),
            start_anchor,
            state: Arc::clone(&self.state),
            source: Arc::clone(&self.source),
            feed_tx: Arc::clone(&self.feed_tx),
        }
    }

    fn publish_status(&self, status: SessionStatus) {
        let _ = self.status_tx.send(status);
    }

    async fn publish_feed(&self) {
        let feed = self.state.lock().await.feed();
        let _ = self.feed_tx.send(feed);
    }
}
