use chrono::{DateTime, Duration, TimeZone, Utc};
use lettings_sla::sla::compliance::{
    average_response_time, color_for_compliance_rate, compliance_rate, display_text,
};
use lettings_sla::sla::deadline::calculate_deadline;
use lettings_sla::sla::evaluator::{format_time_remaining, is_approaching_deadline, is_overdue};
use lettings_sla::sla::{ColorTier, FixedClock, Issue, IssuePriority, SlaConfiguration, SlaEngine};
use std::sync::Arc;

fn new_year() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn agency_config() -> SlaConfiguration {
    SlaConfiguration {
        emergency_response_hours: 4,
        urgent_response_hours: 24,
        routine_response_hours: 72,
        maintenance_response_days: 14,
    }
}

#[test]
fn emergency_deadline_and_countdown_round_trip() {
    let deadline = calculate_deadline(&new_year(), IssuePriority::Emergency, &agency_config());
    assert_eq!(deadline, Utc.with_ymd_and_hms(2025, 1, 1, 4, 0, 0).unwrap());

    let two_am = Utc.with_ymd_and_hms(2025, 1, 1, 2, 0, 0).unwrap();
    let six_am = Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap();
    assert_eq!(format_time_remaining(deadline, two_am), "2h 0m");
    assert_eq!(format_time_remaining(deadline, six_am), "OVERDUE by 2h 0m");
}

#[test]
fn overdue_boundary_is_exclusive_for_every_priority() {
    for priority in IssuePriority::ordered() {
        let deadline = calculate_deadline(&new_year(), priority, &agency_config());
        assert!(deadline > new_year());
        assert!(!is_overdue(deadline, None, None, deadline));
        assert!(is_overdue(
            deadline,
            None,
            None,
            deadline + Duration::milliseconds(1)
        ));
    }
}

#[test]
fn resolved_issues_are_never_overdue_however_late() {
    let deadline = calculate_deadline(&new_year(), IssuePriority::Urgent, &agency_config());
    for days_late in [0, 1, 30, 365] {
        let resolved = deadline + Duration::days(days_late);
        assert!(!is_overdue(
            deadline,
            None,
            Some(resolved),
            resolved + Duration::days(1)
        ));
    }
}

#[test]
fn approaching_deadline_in_final_quarter() {
    let t0 = new_year();
    let deadline = t0 + Duration::hours(100);
    assert!(is_approaching_deadline(deadline, t0, t0 + Duration::hours(80)));
    assert!(!is_approaching_deadline(deadline, t0, t0 + Duration::hours(70)));
}

#[test]
fn compliance_figures_never_fail_on_empty_input() {
    assert_eq!(compliance_rate(0, 0), 100.0);
    assert_eq!(compliance_rate(10, 8), 80.0);
    assert_eq!(average_response_time(&[]), 0.0);
    assert_eq!(average_response_time(&[None, None]), 0.0);
}

#[test]
fn display_tiers_follow_fixed_thresholds() {
    let cases = [
        (80.0, ColorTier::Success, 4),
        (79.9, ColorTier::Warning, 28),
        (60.0, ColorTier::Warning, 28),
        (59.9, ColorTier::Danger, 52),
    ];

    for (rate, tier, hours) in cases {
        let display = display_text(rate, 4);
        assert_eq!(display.color_tier, tier, "rate {rate}");
        assert_eq!(display.display_hours, hours, "rate {rate}");
        assert_eq!(color_for_compliance_rate(rate), tier);
    }
}

#[test]
fn engine_results_are_independent_of_call_order() {
    let engine = SlaEngine::new(
        agency_config(),
        Arc::new(FixedClock::at(new_year() + Duration::hours(30))),
    );
    let issues = vec![
        Issue::raised("ISS-1", IssuePriority::Urgent, new_year()),
        Issue::raised("ISS-2", IssuePriority::Emergency, new_year())
            .acknowledged(new_year() + Duration::hours(1)),
    ];
    let mut reversed = issues.clone();
    reversed.reverse();

    assert_eq!(engine.compliance(&issues, 4), engine.compliance(&reversed, 4));

    let handles: Vec<_> = issues
        .iter()
        .cloned()
        .map(|issue| {
            let engine = engine.clone();
            std::thread::spawn(move || engine.evaluate(&issue))
        })
        .collect();
    for (handle, issue) in handles.into_iter().zip(&issues) {
        let snapshot = handle.join().expect("evaluation thread");
        assert_eq!(snapshot, engine.evaluate(issue));
    }
}
