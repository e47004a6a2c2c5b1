//! Demo runner: drives a short simulated live session end to end, then
//! aggregates what it recorded and prints the insights report.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;

use moodtrack::{
    AggregateOutcome, HistoricalReading, HistoryAggregator, MemoryStore, Period,
    SessionController, SimulatedSource,
};

const DEMO_USER: &str = "demo-user";
const DEMO_SECONDS: u64 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("moodtrack demo starting up...");

    let store = MemoryStore::new();
    let source = SimulatedSource::new();
    let controller = SessionController::new(Arc::new(store.clone()), Arc::new(source));

    controller.start(DEMO_USER).await?;
    let session_id = controller
        .session_id()
        .await
        .unwrap_or_else(|| "unknown".into());
    info!("session {session_id} active, polling for {DEMO_SECONDS}s");

    let mut feed_rx = controller.subscribe_feed();
    let deadline = tokio::time::sleep(Duration::from_secs(DEMO_SECONDS));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = feed_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let feed = feed_rx.borrow_and_update().clone();
                if let Some(snapshot) = &feed.snapshot {
                    info!(
                        "snapshot: {} (raw {}), stress {:.0}, confidence {:.0}%, {} trend points",
                        snapshot.emotion.as_str(),
                        snapshot.emotion_raw,
                        snapshot.stress_score,
                        snapshot.confidence_pct(),
                        feed.trend.len()
                    );
                    // Mirror the live feed into history so the aggregation
                    // pass below has something to chew on.
                    store
                        .insert_reading(HistoricalReading {
                            session_id: session_id.clone(),
                            emotion: snapshot.emotion_raw.clone(),
                            stress_score: snapshot.stress_score,
                            confidence: snapshot.confidence,
                            recorded_at: snapshot.observed_at,
                            face_detected: snapshot.face_detected,
                        })
                        .await;
                }
            }
        }
    }

    let stopped = controller.stop().await?;
    info!("session stopped: {}", stopped.status);
    if let Some(err) = stopped.end_error {
        info!("session end call failed (non-fatal): {err}");
    }

    let aggregator = HistoryAggregator::new(Arc::new(store));
    match aggregator.aggregate(DEMO_USER, Period::Day).await? {
        AggregateOutcome::NoData { skipped_sessions } => {
            info!("no data in window ({skipped_sessions} sessions skipped)");
        }
        AggregateOutcome::Report(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
