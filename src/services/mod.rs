pub mod memory;
pub mod simulated;

pub use memory::MemoryStore;
pub use simulated::SimulatedSource;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::models::{HistoricalReading, RawSnapshot, Session};

/// External session registry: opens and closes session records.
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn begin(&self, user_id: &str) -> CoreResult<Session>;
    async fn end(&self, session_id: &str) -> CoreResult<()>;
}

/// External analysis source polled once per tick while a session is active.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn poll(&self) -> CoreResult<RawSnapshot>;
}

/// External store of past sessions and their readings.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn list_sessions(&self, user_id: &str, window_days: i64) -> CoreResult<Vec<Session>>;
    async fn list_readings(&self, session_id: &str) -> CoreResult<Vec<HistoricalReading>>;
}
