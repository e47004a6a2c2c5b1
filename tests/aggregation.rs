//! History aggregation against the in-memory store, including the
//! partial-failure and empty-window shapes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use moodtrack::{
    AggregateOutcome, CoreError, CoreResult, HistoricalReading, HistoryAggregator, HistoryStore,
    MemoryStore, Period, Session, SessionStatus,
};

fn session(id: &str, user_id: &str, days_ago: i64) -> Session {
    Session {
        id: id.into(),
        user_id: user_id.into(),
        started_at: Utc::now() - Duration::days(days_ago),
        ended_at: Some(Utc::now() - Duration::days(days_ago) + Duration::minutes(10)),
        status: SessionStatus::Idle,
    }
}

fn reading(session_id: &str, emotion: &str, score: f64, days_ago: i64) -> HistoricalReading {
    HistoricalReading {
        session_id: session_id.into(),
        emotion: emotion.into(),
        stress_score: score,
        confidence: 0.9,
        recorded_at: Utc::now() - Duration::days(days_ago),
        face_detected: true,
    }
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_session(session("s-recent", "alice", 0)).await;
    store.insert_session(session("s-old", "alice", 3)).await;
    store
        .insert_reading(reading("s-recent", "angry", 80.0, 0))
        .await;
    store
        .insert_reading(reading("s-recent", "calm", 10.0, 0))
        .await;
    store.insert_reading(reading("s-old", "happy", 15.0, 3)).await;
    store
}

#[tokio::test]
async fn empty_window_yields_the_explicit_no_data_shape() {
    let aggregator = HistoryAggregator::new(Arc::new(MemoryStore::new()));

    match aggregator.aggregate("nobody", Period::Week).await.unwrap() {
        AggregateOutcome::NoData { skipped_sessions } => assert_eq!(skipped_sessions, 0),
        AggregateOutcome::Report(report) => panic!("expected NoData, got {report:?}"),
    }
}

#[tokio::test]
async fn period_selects_the_window() {
    let store = seeded_store().await;
    let aggregator = HistoryAggregator::new(Arc::new(store));

    // Day window (1 day) sees only the recent session.
    let day = aggregator.aggregate("alice", Period::Day).await.unwrap();
    match day {
        AggregateOutcome::Report(report) => {
            assert_eq!(report.stats.total_sessions, 1);
            assert_eq!(report.stats.total_readings, 2);
        }
        other => panic!("expected report, got {other:?}"),
    }

    // Week window (7 days) sees both.
    let week = aggregator.aggregate("alice", Period::Week).await.unwrap();
    match week {
        AggregateOutcome::Report(report) => {
            assert_eq!(report.stats.total_sessions, 2);
            assert_eq!(report.stats.total_readings, 3);
        }
        other => panic!("expected report, got {other:?}"),
    }
}

#[tokio::test]
async fn same_day_angry_and_calm_split_evenly() {
    let store = MemoryStore::new();
    store.insert_session(session("s-1", "bob", 0)).await;
    store.insert_reading(reading("s-1", "angry", 80.0, 0)).await;
    store.insert_reading(reading("s-1", "calm", 10.0, 0)).await;

    let aggregator = HistoryAggregator::new(Arc::new(store));
    match aggregator.aggregate("bob", Period::Day).await.unwrap() {
        AggregateOutcome::Report(report) => {
            assert_eq!(report.daily_distribution.len(), 1);
            let day = &report.daily_distribution[0];
            assert_eq!(day.stressed, 50.0);
            assert_eq!(day.calm, 50.0);
            assert_eq!(day.reading_count, 2);
            assert_eq!(report.stats.avg_stress_score, 45.0);
            assert_eq!(report.stats.calm_readings, 1);
        }
        other => panic!("expected report, got {other:?}"),
    }
}

#[tokio::test]
async fn stats_are_never_nan() {
    // Sessions exist but every reading carries a junk label.
    let store = MemoryStore::new();
    store.insert_session(session("s-1", "carol", 0)).await;
    store
        .insert_reading(reading("s-1", "error", -1.0, 0))
        .await;

    let aggregator = HistoryAggregator::new(Arc::new(store));
    match aggregator.aggregate("carol", Period::Day).await.unwrap() {
        AggregateOutcome::Report(report) => {
            assert!(report.stats.avg_stress_score.is_finite());
            assert_eq!(report.stats.total_readings, 0);
            assert!(report.daily_distribution.is_empty());
        }
        other => panic!("expected report, got {other:?}"),
    }
}

/// Store wrapper that refuses to serve readings for one session.
struct FlakyStore {
    inner: MemoryStore,
    broken_session: String,
}

#[async_trait]
impl HistoryStore for FlakyStore {
    async fn list_sessions(&self, user_id: &str, window_days: i64) -> CoreResult<Vec<Session>> {
        self.inner.list_sessions(user_id, window_days).await
    }

    async fn list_readings(&self, session_id: &str) -> CoreResult<Vec<HistoricalReading>> {
        if session_id == self.broken_session {
            return Err(CoreError::Transport("connection reset".into()));
        }
        self.inner.list_readings(session_id).await
    }
}

#[tokio::test]
async fn failed_session_fetch_is_skipped_not_fatal() {
    let store = seeded_store().await;
    let aggregator = HistoryAggregator::new(Arc::new(FlakyStore {
        inner: store,
        broken_session: "s-recent".into(),
    }));

    match aggregator.aggregate("alice", Period::Week).await.unwrap() {
        AggregateOutcome::Report(report) => {
            assert_eq!(report.skipped_sessions, 1);
            // Only the old session's happy reading survives.
            assert_eq!(report.stats.total_sessions, 1);
            assert_eq!(report.stats.total_readings, 1);
            assert_eq!(report.stats.avg_stress_score, 15.0);
        }
        other => panic!("expected report, got {other:?}"),
    }
}

#[tokio::test]
async fn all_sessions_failing_degrades_to_no_data() {
    let store = MemoryStore::new();
    store.insert_session(session("s-1", "dave", 0)).await;
    store.insert_session(session("s-2", "dave", 1)).await;

    struct BrokenStore(MemoryStore);

    #[async_trait]
    impl HistoryStore for BrokenStore {
        async fn list_sessions(&self, user_id: &str, window_days: i64) -> CoreResult<Vec<Session>> {
            self.0.list_sessions(user_id, window_days).await
        }

        async fn list_readings(&self, _session_id: &str) -> CoreResult<Vec<HistoricalReading>> {
            Err(CoreError::Transport("readings table unavailable".into()))
        }
    }

    let aggregator = HistoryAggregator::new(Arc::new(BrokenStore(store)));
    match aggregator.aggregate("dave", Period::Week).await.unwrap() {
        AggregateOutcome::NoData { skipped_sessions } => assert_eq!(skipped_sessions, 2),
        AggregateOutcome::Report(report) => panic!("expected NoData, got {report:?}"),
    }
}

#[tokio::test]
async fn period_window_days_match_the_contract() {
    assert_eq!(Period::Day.window_days(), 1);
    assert_eq!(Period::Week.window_days(), 7);
    assert_eq!(Period::Month.window_days(), 30);
    assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
    assert!("fortnight".parse::<Period>().is_err());
}
