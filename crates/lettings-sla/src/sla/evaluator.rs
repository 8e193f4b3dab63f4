//! Per-issue SLA state derived from timestamps.
//!
//! Every function takes the current time explicitly; none of them read a
//! clock on their own.

use super::clock::round_to_tenth;
use chrono::{DateTime, Duration, Utc};

const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Whether an issue has breached its response deadline.
///
/// A resolved issue is never overdue, however late it was closed. Once
/// acknowledged, the answer is fixed by whether the acknowledgement itself
/// came after the deadline.
pub fn is_overdue(
    deadline: DateTime<Utc>,
    acknowledged_at: Option<DateTime<Utc>>,
    resolved_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    if resolved_at.is_some() {
        return false;
    }

    match acknowledged_at {
        None => now > deadline,
        Some(acknowledged) => acknowledged > deadline,
    }
}

/// Hours from raise to first response, one decimal place.
pub fn response_time_hours(
    raised_at: DateTime<Utc>,
    acknowledged_at: Option<DateTime<Utc>>,
) -> Option<f64> {
    acknowledged_at.map(|acknowledged| elapsed(raised_at, acknowledged, SECONDS_PER_HOUR))
}

/// Days from raise to resolution, one decimal place.
pub fn resolution_time_days(
    raised_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
) -> Option<f64> {
    resolved_at.map(|resolved| elapsed(raised_at, resolved, SECONDS_PER_DAY))
}

fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>, unit_seconds: f64) -> f64 {
    let millis = (to - from).num_milliseconds() as f64;
    round_to_tenth(millis / 1_000.0 / unit_seconds)
}

/// True inside the final quarter of the response window. An overdue issue
/// is never "approaching".
pub fn is_approaching_deadline(
    deadline: DateTime<Utc>,
    raised_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    let remaining = deadline - now;
    if remaining < Duration::zero() {
        return false;
    }

    let window = deadline - raised_at;
    remaining.num_milliseconds() * 4 <= window.num_milliseconds()
}

/// Human readable time left, e.g. `"2h 15m"`, `"45m"` or `"OVERDUE by 1h 0m"`.
pub fn format_time_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let difference = deadline - now;
    let overdue = difference < Duration::zero();
    let magnitude = if overdue { -difference } else { difference };
    let hours = magnitude.num_hours();
    let minutes = (magnitude - Duration::hours(hours)).num_minutes();

    let span = if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    };

    if overdue {
        format!("OVERDUE by {span}")
    } else {
        span
    }
}
