use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::warn;

use crate::emotion::{canonicalize, CanonicalEmotion};
use crate::error::CoreResult;
use crate::models::HistoricalReading;
use crate::services::HistoryStore;

use super::types::{
    AggregateOutcome, AggregatedStats, DailyDistribution, DayCounts, InsightsReport, Period,
};

/// Day buckets kept in the rendered distribution; older buckets still feed
/// the window-wide stats.
const DISPLAY_DAYS: usize = 7;

/// Stateless aggregation engine over the external history store. Reentrant:
/// concurrent `aggregate` calls share nothing mutable.
#[derive(Clone)]
pub struct HistoryAggregator {
    store: Arc<dyn HistoryStore>,
}

impl HistoryAggregator {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Aggregate a user's readings over the period window into per-day
    /// emotion distributions and window-wide stats.
    ///
    /// A session whose readings cannot be fetched is skipped and counted,
    /// never aborting the pass. Readings with unrecognized labels are
    /// dropped. Zero sessions (or zero fetchable ones) yield the explicit
    /// no-data outcome.
    pub async fn aggregate(&self, user_id: &str, period: Period) -> CoreResult<AggregateOutcome> {
        let sessions = self
            .store
            .list_sessions(user_id, period.window_days())
            .await?;

        if sessions.is_empty() {
            return Ok(AggregateOutcome::NoData {
                skipped_sessions: 0,
            });
        }

        // Fan out per-session reading fetches; merge order is irrelevant
        // since grouping keys on the calendar day.
        let mut handles = Vec::with_capacity(sessions.len());
        for session in &sessions {
            let store = Arc::clone(&self.store);
            let session_id = session.id.clone();
            handles.push(tokio::spawn(async move {
                let readings = store.list_readings(&session_id).await;
                (session_id, readings)
            }));
        }

        let mut skipped_sessions = 0usize;
        let mut per_session: Vec<Vec<HistoricalReading>> = Vec::with_capacity(sessions.len());
        for handle in handles {
            match handle.await {
                Ok((_, Ok(readings))) => per_session.push(readings),
                Ok((session_id, Err(err))) => {
                    warn!("skipping session {session_id} during aggregation: {err}");
                    skipped_sessions += 1;
                }
                Err(err) => {
                    warn!("reading fetch task failed to join: {err}");
                    skipped_sessions += 1;
                }
            }
        }

        if per_session.is_empty() {
            return Ok(AggregateOutcome::NoData { skipped_sessions });
        }

        let stats = compute_stats(&per_session);
        let daily_distribution = compute_daily_distribution(&per_session);

        Ok(AggregateOutcome::Report(InsightsReport {
            daily_distribution,
            stats,
            skipped_sessions,
        }))
    }
}

/// Window-wide stats over every successfully fetched session.
///
/// The average is session-weighted on purpose: each session's own average
/// stress contributes one share regardless of how many readings it holds,
/// and a session with no valid readings contributes zero.
fn compute_stats(per_session: &[Vec<HistoricalReading>]) -> AggregatedStats {
    let total_sessions = per_session.len();
    let mut total_readings = 0u64;
    let mut calm_readings = 0u64;
    let mut session_avg_sum = 0f64;

    for readings in per_session {
        let mut count = 0u64;
        let mut score_sum = 0f64;
        for reading in readings {
            let Ok(emotion) = canonicalize(&reading.emotion) else {
                continue;
            };
            count += 1;
            score_sum += reading.stress_score;
            if emotion == CanonicalEmotion::Calm {
                calm_readings += 1;
            }
        }

        total_readings += count;
        if count > 0 {
            session_avg_sum += score_sum / count as f64;
        }
    }

    AggregatedStats {
        total_readings,
        // total_sessions >= 1 here, so this can never be NaN.
        avg_stress_score: session_avg_sum / total_sessions as f64,
        calm_readings,
        total_sessions,
    }
}

/// Bucket valid readings by local calendar day and turn counts into
/// percentages. Buckets come out chronological; only the most recent
/// `DISPLAY_DAYS` survive the display cut.
fn compute_daily_distribution(per_session: &[Vec<HistoricalReading>]) -> Vec<DailyDistribution> {
    let mut buckets: BTreeMap<NaiveDate, DayCounts> = BTreeMap::new();

    for readings in per_session {
        for reading in readings {
            let Ok(emotion) = canonicalize(&reading.emotion) else {
                continue;
            };
            let day = reading.recorded_at.with_timezone(&Local).date_naive();
            buckets.entry(day).or_default().bump(emotion);
        }
    }

    let mut daily: Vec<DailyDistribution> = buckets
        .into_iter()
        .filter(|(_, counts)| counts.total() > 0)
        .map(|(date, counts)| DailyDistribution::from_counts(date, counts))
        .collect();

    if daily.len() > DISPLAY_DAYS {
        daily.drain(..daily.len() - DISPLAY_DAYS);
    }
    daily
}
