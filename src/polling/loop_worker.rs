use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::emotion::canonicalize;
use crate::error::{CoreError, CoreResult};
use crate::models::{RawSnapshot, SessionStatus, Snapshot, TrendPoint};
use crate::services::SnapshotSource;
use crate::session::{LiveFeed, SessionState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Fixed poll period; the first tick fires immediately on entering Active.
pub const POLL_INTERVAL_SECS: u64 = 1;
/// Bound on a single fetch; expiry counts as a transport failure and is
/// retried at the next tick.
pub const POLL_TIMEOUT_SECS: u64 = 5;

/// Everything one active stretch of polling needs.
pub(crate) struct PollContext {
    pub session_id: String,
    /// Monotonic session-start reference; shared across pause/resume so
    /// elapsed seconds never reset mid-session.
    pub start_anchor: Instant,
    pub state: Arc<Mutex<SessionState>>,
    pub source: Arc<dyn SnapshotSource>,
    pub feed_tx: Arc<watch::Sender<LiveFeed>>,
}

/// Fixed-period, single-flight poll loop. A tick is awaited inline, so two
/// fetches can never overlap; ticks that lapse while a slow fetch is in
/// flight are skipped, not queued. A bad sample or a transport hiccup is
/// logged and the loop keeps going.
pub(crate) async fn poll_loop(ctx: PollContext, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(Duration::from_secs(POLL_INTERVAL_SECS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = perform_poll(&ctx);
                match tokio::time::timeout(Duration::from_secs(POLL_TIMEOUT_SECS), fut).await {
                    Ok(Ok(())) => {},
                    Ok(Err(err)) => log_warn!("dropped poll tick for session {}: {err}", ctx.session_id),
                    Err(_) => log_warn!("snapshot fetch timeout (> {}s) session {}", POLL_TIMEOUT_SECS, ctx.session_id),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("poll loop for session {} shutting down", ctx.session_id);
                break;
            }
        }
    }
}

async fn perform_poll(ctx: &PollContext) -> CoreResult<()> {
    let raw = ctx.source.poll().await?;
    let observed_at = Utc::now();
    let snapshot = validate_raw(raw, observed_at)?;

    let elapsed_seconds = ctx.start_anchor.elapsed().as_secs() as i64;
    let point = TrendPoint {
        elapsed_seconds,
        score: snapshot.stress_score,
    };

    let feed = {
        let mut state = ctx.state.lock().await;
        // A pause/stop may have won the race while the fetch was in flight;
        // a sample observed outside Active is discarded.
        if state.status != SessionStatus::Active {
            return Ok(());
        }
        state.trend.append(point);
        state.current = Some(snapshot);
        state.feed()
    };

    let _ = ctx.feed_tx.send(feed);
    Ok(())
}

/// Structural validation of a fetched payload: required fields present,
/// numeric fields finite and in range, label canonicalizable.
pub(crate) fn validate_raw(raw: RawSnapshot, observed_at: DateTime<Utc>) -> CoreResult<Snapshot> {
    let label = raw
        .emotion
        .ok_or_else(|| CoreError::Validation("missing emotion label".into()))?;
    let stress_score = raw
        .stress_score
        .ok_or_else(|| CoreError::Validation("missing stress score".into()))?;
    let confidence = raw
        .confidence
        .ok_or_else(|| CoreError::Validation("missing confidence".into()))?;

    if !stress_score.is_finite() || !(0.0..=100.0).contains(&stress_score) {
        return Err(CoreError::Validation(format!(
            "stress score {stress_score} outside 0-100"
        )));
    }
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(CoreError::Validation(format!(
            "confidence {confidence} outside 0.0-1.0"
        )));
    }

    let emotion = canonicalize(&label)?;

    Ok(Snapshot {
        emotion_raw: label,
        emotion,
        stress_score,
        confidence,
        face_detected: raw.face_detected,
        observed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::CanonicalEmotion;

    fn raw(emotion: &str, score: f64, confidence: f64) -> RawSnapshot {
        RawSnapshot {
            emotion: Some(emotion.to_string()),
            stress_score: Some(score),
            confidence: Some(confidence),
            face_detected: true,
        }
    }

    #[test]
    fn valid_payload_becomes_snapshot() {
        let snapshot = validate_raw(raw("angry", 85.0, 0.9), Utc::now()).unwrap();
        assert_eq!(snapshot.emotion, CanonicalEmotion::Stressed);
        assert_eq!(snapshot.emotion_raw, "angry");
        assert_eq!(snapshot.stress_score, 85.0);
        assert_eq!(snapshot.confidence_pct(), 90.0);
    }

    #[test]
    fn missing_fields_fail_validation() {
        let missing_label = RawSnapshot {
            emotion: None,
            stress_score: Some(10.0),
            confidence: Some(0.8),
            face_detected: false,
        };
        assert!(matches!(
            validate_raw(missing_label, Utc::now()),
            Err(CoreError::Validation(_))
        ));

        let missing_score = RawSnapshot {
            emotion: Some("calm".into()),
            stress_score: None,
            confidence: Some(0.8),
            face_detected: false,
        };
        assert!(matches!(
            validate_raw(missing_score, Utc::now()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        assert!(matches!(
            validate_raw(raw("calm", -1.0, 0.8), Utc::now()),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_raw(raw("calm", 10.0, 1.5), Utc::now()),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            validate_raw(raw("calm", f64::NAN, 0.8), Utc::now()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn unknown_label_is_invalid_label_not_validation() {
        assert!(matches!(
            validate_raw(raw("surprise", 40.0, 0.8), Utc::now()),
            Err(CoreError::InvalidLabel(_))
        ));
    }
}
