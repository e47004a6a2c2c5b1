use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{poll_loop, PollContext};

/// Owns the poll task for one active stretch of a session. The task's
/// lifetime is scoped exactly to Active: started on start/resume, cancelled
/// and joined on pause/stop.
pub(crate) struct PollerController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl PollerController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start_polling(&mut self, ctx: PollContext) -> Result<()> {
        if self.handle.is_some() {
            bail!("poller already active");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(poll_loop(ctx, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel and join the poll task. Once this returns no further tick can
    /// fire; callers rely on that for the pause/stop guarantee.
    pub async fn stop_polling(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("poll loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Drop for PollerController {
    fn drop(&mut self) {
        // No dangling timer if the owner goes away without a clean stop.
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}
