use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::sla::{sla_router, FixedClock, Issue, IssuePriority, SlaConfiguration, SlaEngine};

pub(super) fn raised_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

pub(super) fn hours_after_raise(hours: i64) -> DateTime<Utc> {
    raised_at() + Duration::hours(hours)
}

pub(super) fn config() -> SlaConfiguration {
    SlaConfiguration {
        emergency_response_hours: 4,
        urgent_response_hours: 24,
        routine_response_hours: 72,
        maintenance_response_days: 14,
    }
}

pub(super) fn engine_at(now: DateTime<Utc>) -> SlaEngine<FixedClock> {
    SlaEngine::new(config(), Arc::new(FixedClock::at(now)))
}

pub(super) fn emergency_issue(id: &str) -> Issue {
    Issue::raised(id, IssuePriority::Emergency, raised_at())
}

/// Mixed portfolio evaluated at two days after raise.
pub(super) fn portfolio() -> Vec<Issue> {
    vec![
        // answered in 2h of a 4h budget
        emergency_issue("ISS-1").acknowledged(hours_after_raise(2)),
        // answered 6h in, late
        emergency_issue("ISS-2")
            .acknowledged(hours_after_raise(6))
            .resolved(hours_after_raise(30)),
        // never answered, 24h budget long gone
        Issue::raised("ISS-3", IssuePriority::Urgent, raised_at()),
        // routine, 72h budget still open
        Issue::raised("ISS-4", IssuePriority::Routine, raised_at()),
        // low priority closed inside 14 days without separate acknowledgement
        Issue::raised("ISS-5", IssuePriority::Low, raised_at()).resolved(hours_after_raise(40)),
    ]
}

pub(super) fn router_at(now: DateTime<Utc>) -> axum::Router {
    sla_router(Arc::new(engine_at(now)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
