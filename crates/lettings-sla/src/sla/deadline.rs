use super::domain::{IssuePriority, SlaConfiguration};
use chrono::{DateTime, Days, Duration, TimeZone};

/// Response budget for one priority tier, in the unit the agency set it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseBudget {
    Hours(u32),
    Days(u32),
}

impl ResponseBudget {
    pub fn for_priority(priority: IssuePriority, config: &SlaConfiguration) -> Self {
        match priority {
            IssuePriority::Emergency => Self::Hours(config.emergency_response_hours),
            IssuePriority::Urgent => Self::Hours(config.urgent_response_hours),
            IssuePriority::Routine => Self::Hours(config.routine_response_hours),
            IssuePriority::Low => Self::Days(config.maintenance_response_days),
        }
    }

    /// Apply the budget to `start`. Hours are wall-clock hours; days are
    /// calendar days in `start`'s time zone.
    pub fn apply<Tz: TimeZone>(self, start: &DateTime<Tz>) -> DateTime<Tz> {
        match self {
            Self::Hours(hours) => start.clone() + Duration::hours(i64::from(hours)),
            Self::Days(days) => add_calendar_days(start, days),
        }
    }
}

/// Same local time of day `days` later. A repeated local time resolves to
/// its first occurrence; a skipped one to `days * 24h` of elapsed time.
fn add_calendar_days<Tz: TimeZone>(start: &DateTime<Tz>, days: u32) -> DateTime<Tz> {
    let elapsed = || start.clone() + Duration::days(i64::from(days));

    match start.naive_local().checked_add_days(Days::new(u64::from(days))) {
        Some(local) => start
            .timezone()
            .from_local_datetime(&local)
            .earliest()
            .unwrap_or_else(elapsed),
        None => elapsed(),
    }
}

/// Deadline by which an issue raised at `raised_at` must receive a response.
///
/// Weekends and holidays are not excluded. `low` priority adds whole
/// calendar days, so the local time of day is kept across DST changes.
pub fn calculate_deadline<Tz: TimeZone>(
    raised_at: &DateTime<Tz>,
    priority: IssuePriority,
    config: &SlaConfiguration,
) -> DateTime<Tz> {
    ResponseBudget::for_priority(priority, config).apply(raised_at)
}
