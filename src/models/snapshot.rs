use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::emotion::CanonicalEmotion;

/// Wire payload from the analysis source, one per poll.
///
/// Fields are optional because the source emits sentinel payloads when no
/// face is in frame or the detector crashed; structural validation happens in
/// the poll loop before anything downstream sees the sample.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub emotion: Option<String>,
    pub stress_score: Option<f64>,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub face_detected: bool,
}

/// One validated, canonicalized observation from the analysis source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub emotion_raw: String,
    pub emotion: CanonicalEmotion,
    /// 0–100, higher is more stressed.
    pub stress_score: f64,
    /// 0.0–1.0 as reported by the detector.
    pub confidence: f64,
    pub face_detected: bool,
    pub observed_at: DateTime<Utc>,
}

impl Snapshot {
    /// Confidence scaled to 0–100 for display consumers.
    pub fn confidence_pct(&self) -> f64 {
        self.confidence * 100.0
    }
}

/// One point on the live stress trend chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Seconds since the session started, never negative.
    pub elapsed_seconds: i64,
    pub score: f64,
}

/// One stored emotion reading from a past session. The label is kept raw;
/// canonicalization happens at aggregation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalReading {
    pub session_id: String,
    pub emotion: String,
    pub stress_score: f64,
    pub confidence: f64,
    pub recorded_at: DateTime<Utc>,
    pub face_detected: bool,
}
