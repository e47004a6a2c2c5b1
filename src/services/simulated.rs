use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::CoreResult;
use crate::models::RawSnapshot;
use crate::services::SnapshotSource;

/// Detector's emotion-to-stress mapping. `surprise` is part of the detector
/// vocabulary but not of the canonical taxonomy, so simulated `surprise`
/// samples get dropped downstream like they do against the real source.
const STRESS_MAP: &[(&str, f64)] = &[
    ("happy", 15.0),
    ("neutral", 25.0),
    ("surprise", 40.0),
    ("sad", 70.0),
    ("fear", 80.0),
    ("angry", 85.0),
    ("disgust", 75.0),
];

/// Snapshot source that fabricates scored samples, standing in for the
/// camera-backed analysis service when none is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedSource;

impl SimulatedSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SnapshotSource for SimulatedSource {
    async fn poll(&self) -> CoreResult<RawSnapshot> {
        let mut rng = rand::thread_rng();
        let (emotion, score) = STRESS_MAP
            .choose(&mut rng)
            .copied()
            .unwrap_or(("neutral", 25.0));
        let confidence = (rng.gen_range(0.70_f64..0.99) * 100.0).round() / 100.0;

        Ok(RawSnapshot {
            emotion: Some(emotion.to_string()),
            stress_score: Some(score),
            confidence: Some(confidence),
            face_detected: true,
        })
    }
}
