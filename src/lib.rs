//! Session lifecycle and analytics core for live emotion tracking.
//!
//! Two independent halves:
//! - [`session::SessionController`] runs one live session at a time: an
//!   Idle/Active/Paused state machine driving a fixed-period poll loop
//!   against a [`services::SnapshotSource`], with a bounded rolling trend
//!   buffer and watch-channel subscriptions for status and feed updates.
//! - [`analytics::HistoryAggregator`] turns stored readings from a
//!   [`services::HistoryStore`] into per-day emotion distributions and
//!   window-wide stats, on demand.
//!
//! Detection, auth, persistence and transport live behind the traits in
//! [`services`].

pub mod analytics;
pub mod emotion;
pub mod error;
pub mod models;
pub mod polling;
pub mod services;
pub mod session;
mod utils;

pub use analytics::{
    AggregateOutcome, AggregatedStats, DailyDistribution, HistoryAggregator, InsightsReport,
    Period,
};
pub use emotion::{canonicalize, CanonicalEmotion};
pub use error::{CoreError, CoreResult};
pub use models::{HistoricalReading, RawSnapshot, Session, SessionStatus, Snapshot, TrendPoint};
pub use services::{HistoryStore, MemoryStore, SessionService, SimulatedSource, SnapshotSource};
pub use session::{LiveFeed, SessionController, StopReport, TrendBuffer, TREND_CAPACITY};
