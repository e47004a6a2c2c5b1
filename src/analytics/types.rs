use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::emotion::CanonicalEmotion;
use crate::error::CoreError;

/// User-selected aggregation window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub fn window_days(self) -> i64 {
        match self {
            Period::Day => 1,
            Period::Week => 7,
            Period::Month => 30,
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(CoreError::Validation(format!("unknown period `{other}`"))),
        }
    }
}

/// Per-emotion occurrence counts for one local calendar day. Fixed shape,
/// one field per canonical emotion.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DayCounts {
    pub happy: u32,
    pub sad: u32,
    pub neutral: u32,
    pub stressed: u32,
    pub calm: u32,
}

impl DayCounts {
    pub fn bump(&mut self, emotion: CanonicalEmotion) {
        match emotion {
            CanonicalEmotion::Happy => self.happy += 1,
            CanonicalEmotion::Sad => self.sad += 1,
            CanonicalEmotion::Neutral => self.neutral += 1,
            CanonicalEmotion::Stressed => self.stressed += 1,
            CanonicalEmotion::Calm => self.calm += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.happy + self.sad + self.neutral + self.stressed + self.calm
    }
}

/// Percentage mix of canonical emotions for one local calendar day.
/// Percentages sum to 100 (± rounding) whenever `reading_count` > 0; days
/// with no valid readings are never emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDistribution {
    pub date: NaiveDate,
    pub happy: f64,
    pub sad: f64,
    pub neutral: f64,
    pub stressed: f64,
    pub calm: f64,
    pub reading_count: u32,
}

impl DailyDistribution {
    pub(crate) fn from_counts(date: NaiveDate, counts: DayCounts) -> Self {
        let total = f64::from(counts.total());
        Self {
            date,
            happy: f64::from(counts.happy) / total * 100.0,
            sad: f64::from(counts.sad) / total * 100.0,
            neutral: f64::from(counts.neutral) / total * 100.0,
            stressed: f64::from(counts.stressed) / total * 100.0,
            calm: f64::from(counts.calm) / total * 100.0,
            reading_count: counts.total(),
        }
    }
}

/// Summary statistics over the whole selected window (not the 7-day display
/// cut). `avg_stress_score` is a session-weighted mean: per-session averages
/// averaged over the session count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStats {
    pub total_readings: u64,
    pub avg_stress_score: f64,
    pub calm_readings: u64,
    pub total_sessions: usize,
}

/// Full aggregation payload for a user and period.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    /// Chronological day buckets, truncated to the most recent 7 for display.
    pub daily_distribution: Vec<DailyDistribution>,
    pub stats: AggregatedStats,
    /// Sessions whose readings could not be fetched and were left out.
    pub skipped_sessions: usize,
}

/// Aggregation result. No-data is a distinct shape rather than a stats object
/// full of division-by-zero artifacts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AggregateOutcome {
    #[serde(rename_all = "camelCase")]
    NoData { skipped_sessions: usize },
    Report(InsightsReport),
}
