mod aggregate;
mod types;

pub use aggregate::HistoryAggregator;
pub use types::{AggregateOutcome, AggregatedStats, DailyDistribution, InsightsReport, Period};
