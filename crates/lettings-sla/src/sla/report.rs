use super::compliance::{
    average_response_time, color_for_compliance_rate, compliance_rate, display_text,
    ResponseTimeDisplay,
};
use super::domain::{ColorTier, IssueId, IssuePriority};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityBreakdown {
    pub priority: IssuePriority,
    pub priority_label: String,
    pub raised: u32,
    pub within_sla: u32,
    pub compliance_rate: f64,
}

/// Aggregate responsiveness figures for one agency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceSnapshot {
    pub total_raised: u32,
    pub within_sla: u32,
    pub compliance_rate: f64,
    pub average_response_hours: f64,
    pub color: ColorTier,
    pub display: ResponseTimeDisplay,
    pub overdue_issues: Vec<IssueId>,
    pub by_priority: Vec<PriorityBreakdown>,
}

impl ComplianceSnapshot {
    /// Snapshot from counts already classified by the caller.
    pub fn from_counts(
        total_raised: u32,
        within_sla: u32,
        response_times: &[Option<f64>],
        target_hours: u32,
    ) -> Self {
        let rate = compliance_rate(total_raised, within_sla);
        Self {
            total_raised,
            within_sla,
            compliance_rate: rate,
            average_response_hours: average_response_time(response_times),
            color: color_for_compliance_rate(rate),
            display: display_text(rate, target_hours),
            overdue_issues: Vec::new(),
            by_priority: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone)]
struct PriorityTally {
    raised: u32,
    within_sla: u32,
}

/// Running tally fed one issue at a time.
#[derive(Debug, Default)]
pub struct ComplianceTally {
    by_priority: HashMap<IssuePriority, PriorityTally>,
    response_times: Vec<Option<f64>>,
    overdue_issues: Vec<IssueId>,
}

impl ComplianceTally {
    /// `within_sla` is `None` while the outcome is still undecided; such
    /// issues contribute response times but not counts.
    pub fn record(
        &mut self,
        priority: IssuePriority,
        within_sla: Option<bool>,
        response_hours: Option<f64>,
    ) {
        self.response_times.push(response_hours);

        if let Some(within) = within_sla {
            let entry = self.by_priority.entry(priority).or_default();
            entry.raised += 1;
            if within {
                entry.within_sla += 1;
            }
        }
    }

    pub fn flag_overdue(&mut self, id: IssueId) {
        self.overdue_issues.push(id);
    }

    pub fn snapshot(self, target_hours: u32) -> ComplianceSnapshot {
        let total_raised = self.by_priority.values().map(|tally| tally.raised).sum();
        let within_sla = self.by_priority.values().map(|tally| tally.within_sla).sum();

        let by_priority = IssuePriority::ordered()
            .into_iter()
            .filter_map(|priority| {
                self.by_priority
                    .get(&priority)
                    .map(|tally| PriorityBreakdown {
                        priority,
                        priority_label: priority.label().to_string(),
                        raised: tally.raised,
                        within_sla: tally.within_sla,
                        compliance_rate: compliance_rate(tally.raised, tally.within_sla),
                    })
            })
            .collect();

        let mut overdue_issues = self.overdue_issues;
        overdue_issues.sort();

        ComplianceSnapshot {
            overdue_issues,
            by_priority,
            ..ComplianceSnapshot::from_counts(
                total_raised,
                within_sla,
                &self.response_times,
                target_hours,
            )
        }
    }
}
