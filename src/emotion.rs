use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Fixed taxonomy used for all charting and aggregation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalEmotion {
    Happy,
    Sad,
    Neutral,
    Stressed,
    Calm,
}

impl CanonicalEmotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalEmotion::Happy => "happy",
            CanonicalEmotion::Sad => "sad",
            CanonicalEmotion::Neutral => "neutral",
            CanonicalEmotion::Stressed => "stressed",
            CanonicalEmotion::Calm => "calm",
        }
    }
}

/// Fold a raw detector label into the canonical taxonomy.
///
/// `angry`, `fear` and `disgust` all map to `Stressed`; the rest of the known
/// vocabulary maps identically. Anything else (e.g. the source's `surprise`,
/// `unknown` or `error` sentinels) is rejected with `InvalidLabel` — callers
/// drop that reading and keep going.
pub fn canonicalize(raw: &str) -> CoreResult<CanonicalEmotion> {
    match raw.to_ascii_lowercase().as_str() {
        "happy" => Ok(CanonicalEmotion::Happy),
        "sad" => Ok(CanonicalEmotion::Sad),
        "neutral" => Ok(CanonicalEmotion::Neutral),
        "calm" => Ok(CanonicalEmotion::Calm),
        "angry" | "fear" | "disgust" => Ok(CanonicalEmotion::Stressed),
        _ => Err(CoreError::InvalidLabel(raw.to_string())),
    }
}
