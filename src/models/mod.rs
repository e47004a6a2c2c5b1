pub mod session;
pub mod snapshot;

pub use session::{Session, SessionStatus};
pub use snapshot::{HistoricalReading, RawSnapshot, Snapshot, TrendPoint};
