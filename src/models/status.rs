use crate::models::money::Amount;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Variance at or above this many percentage points is ahead of schedule.
pub const AHEAD_OF_SCHEDULE_VARIANCE: f64 = 5.0;
/// Variance at or below this many percentage points is critical.
pub const CRITICAL_VARIANCE: f64 = -10.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum ProgressStatus {
    #[default]
    #[serde(rename = "On Track")]
    #[strum(serialize = "On Track")]
    OnTrack,
    #[serde(rename = "Ahead of Schedule")]
    #[strum(serialize = "Ahead of Schedule")]
    AheadOfSchedule,
    #[serde(rename = "Behind Schedule")]
    #[strum(serialize = "Behind Schedule")]
    BehindSchedule,
    Critical,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum PaymentStatus {
    Paid,
    Partial,
    #[default]
    Pending,
}

/// Differences closer than this to a threshold count as landing on it.
const THRESHOLD_TOLERANCE: f64 = 1e-9;

/// Actual minus planned progress, rounded to two decimals for display.
pub fn progress_variance(planned: f64, actual: f64) -> f64 {
    ((actual - planned) * 100.0).round() / 100.0
}

/// Classifies site progress from planned and actual completion percentages.
/// Thresholds are checked in order: ahead (>= +5), critical (<= -10),
/// behind (< 0), otherwise on track. The raw difference is compared, so
/// only floating-point noise is absorbed at a boundary.
pub fn classify_progress(planned: f64, actual: f64) -> ProgressStatus {
    let variance = actual - planned;

    if variance >= AHEAD_OF_SCHEDULE_VARIANCE - THRESHOLD_TOLERANCE {
        ProgressStatus::AheadOfSchedule
    } else if variance <= CRITICAL_VARIANCE + THRESHOLD_TOLERANCE {
        ProgressStatus::Critical
    } else if variance < -THRESHOLD_TOLERANCE {
        ProgressStatus::BehindSchedule
    } else {
        ProgressStatus::OnTrack
    }
}

/// Nothing left to pay is `Paid`, some payment made is `Partial`, else `Pending`.
pub fn classify_payment(total: Amount, paid: Amount) -> PaymentStatus {
    let pending = total - paid;

    if pending <= Amount::ZERO {
        PaymentStatus::Paid
    } else if paid > Amount::ZERO {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    }
}

/// Same as [`classify_payment`] for amounts still held as display strings.
pub fn classify_payment_formatted(total: &str, paid: &str) -> PaymentStatus {
    classify_payment(Amount::parse_formatted(total), Amount::parse_formatted(paid))
}
