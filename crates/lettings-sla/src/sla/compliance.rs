use super::clock::round_to_tenth;
use super::domain::ColorTier;
use serde::{Deserialize, Serialize};

const SUCCESS_THRESHOLD: f64 = 80.0;
const WARNING_THRESHOLD: f64 = 60.0;
const WARNING_GRACE_HOURS: u32 = 24;
const DANGER_GRACE_HOURS: u32 = 48;

/// Percentage of raised issues handled within SLA, one decimal place.
/// An agency with no issues is fully compliant.
pub fn compliance_rate(total_raised: u32, within_sla: u32) -> f64 {
    if total_raised == 0 {
        return 100.0;
    }

    round_to_tenth(f64::from(within_sla) / f64::from(total_raised) * 100.0)
}

/// Mean of the recorded response times, ignoring issues with none yet.
pub fn average_response_time(response_times: &[Option<f64>]) -> f64 {
    let recorded: Vec<f64> = response_times.iter().flatten().copied().collect();
    if recorded.is_empty() {
        return 0.0;
    }

    round_to_tenth(recorded.iter().sum::<f64>() / recorded.len() as f64)
}

pub fn color_for_compliance_rate(rate: f64) -> ColorTier {
    if rate >= SUCCESS_THRESHOLD {
        ColorTier::Success
    } else if rate >= WARNING_THRESHOLD {
        ColorTier::Warning
    } else {
        ColorTier::Danger
    }
}

/// Narrative shown on an agency profile next to its response target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimeDisplay {
    pub text: String,
    pub color_tier: ColorTier,
    pub display_hours: u32,
}

pub fn display_text(compliance_rate: f64, target_hours: u32) -> ResponseTimeDisplay {
    let color_tier = color_for_compliance_rate(compliance_rate);
    let display_hours = match color_tier {
        ColorTier::Warning => target_hours.saturating_add(WARNING_GRACE_HOURS),
        ColorTier::Danger => target_hours.saturating_add(DANGER_GRACE_HOURS),
        _ => target_hours,
    };
    let unit = if display_hours == 1 { "hour" } else { "hours" };

    let text = match color_tier {
        ColorTier::Warning => format!("tries to respond within {display_hours} {unit}"),
        ColorTier::Danger => format!(
            "target response time {display_hours} {unit} (performance below target)"
        ),
        _ => format!("usually responds within {display_hours} {unit}"),
    };

    ResponseTimeDisplay {
        text,
        color_tier,
        display_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliance_rate_handles_empty_history() {
        assert_eq!(compliance_rate(0, 0), 100.0);
        assert_eq!(compliance_rate(10, 8), 80.0);
        assert_eq!(compliance_rate(3, 2), 66.7);
        assert_eq!(compliance_rate(7, 0), 0.0);
    }

    #[test]
    fn average_ignores_missing_entries() {
        assert_eq!(average_response_time(&[]), 0.0);
        assert_eq!(average_response_time(&[None, None]), 0.0);
        assert_eq!(average_response_time(&[Some(2.0), None, Some(3.5)]), 2.8);
        assert_eq!(average_response_time(&[Some(4.0)]), 4.0);
    }

    #[test]
    fn display_tiers_are_inclusive_at_boundaries() {
        let success = display_text(80.0, 4);
        assert_eq!(success.color_tier, ColorTier::Success);
        assert_eq!(success.display_hours, 4);
        assert_eq!(success.text, "usually responds within 4 hours");

        let warning = display_text(79.9, 4);
        assert_eq!(warning.color_tier, ColorTier::Warning);
        assert_eq!(warning.display_hours, 28);
        assert_eq!(warning.text, "tries to respond within 28 hours");

        let warning_floor = display_text(60.0, 4);
        assert_eq!(warning_floor.color_tier, ColorTier::Warning);
        assert_eq!(warning_floor.display_hours, 28);

        let danger = display_text(59.9, 4);
        assert_eq!(danger.color_tier, ColorTier::Danger);
        assert_eq!(danger.display_hours, 52);
        assert_eq!(
            danger.text,
            "target response time 52 hours (performance below target)"
        );
    }

    #[test]
    fn display_uses_singular_hour() {
        assert_eq!(display_text(100.0, 1).text, "usually responds within 1 hour");
    }

    #[test]
    fn badge_color_matches_display_tiers() {
        for rate in [100.0, 80.0, 79.9, 60.0, 59.9, 0.0] {
            assert_eq!(
                color_for_compliance_rate(rate),
                display_text(rate, 4).color_tier
            );
        }
    }
}
