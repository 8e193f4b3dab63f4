use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::clock::Clock;
use super::deadline::calculate_deadline;
use super::domain::{ColorTier, Issue, IssueId, IssuePriority, IssueStatus, SlaConfiguration};
use super::evaluator::{
    format_time_remaining, is_approaching_deadline, is_overdue, resolution_time_days,
    response_time_hours,
};
use super::report::{ComplianceSnapshot, ComplianceTally};

/// Derived SLA state for one issue at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSlaSnapshot {
    pub issue_id: IssueId,
    pub priority: IssuePriority,
    pub priority_label: String,
    pub priority_color: ColorTier,
    pub status: IssueStatus,
    pub status_label: String,
    pub raised_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub overdue: bool,
    pub approaching_deadline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<String>,
    pub response_time_hours: Option<f64>,
    pub resolution_time_days: Option<f64>,
    pub evaluated_at: DateTime<Utc>,
}

/// Applies one agency's SLA configuration to issues, reading the current
/// time from an injected clock.
///
/// Calendar-day budgets are counted in the agency's local time zone,
/// `Europe/London` unless replaced with [`SlaEngine::with_time_zone`].
#[derive(Debug)]
pub struct SlaEngine<C> {
    config: SlaConfiguration,
    clock: Arc<C>,
    time_zone: Tz,
}

impl<C> Clone for SlaEngine<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            clock: Arc::clone(&self.clock),
            time_zone: self.time_zone,
        }
    }
}

impl<C: Clock> SlaEngine<C> {
    pub fn new(config: SlaConfiguration, clock: Arc<C>) -> Self {
        Self {
            config,
            clock,
            time_zone: Tz::Europe__London,
        }
    }

    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn config(&self) -> &SlaConfiguration {
        &self.config
    }

    /// Same clock and zone, different agency budgets.
    pub fn with_config(&self, config: SlaConfiguration) -> Self {
        Self {
            config,
            clock: Arc::clone(&self.clock),
            time_zone: self.time_zone,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn deadline_for(&self, issue: &Issue) -> DateTime<Utc> {
        let local = issue.raised_at.with_timezone(&self.time_zone);
        calculate_deadline(&local, issue.priority, &self.config).with_timezone(&Utc)
    }

    pub fn evaluate(&self, issue: &Issue) -> IssueSlaSnapshot {
        self.evaluate_at(issue, self.clock.now())
    }

    pub fn evaluate_at(&self, issue: &Issue, now: DateTime<Utc>) -> IssueSlaSnapshot {
        let deadline = self.deadline_for(issue);
        let status = issue.status();
        let awaiting_response = status == IssueStatus::Open;

        IssueSlaSnapshot {
            issue_id: issue.id.clone(),
            priority: issue.priority,
            priority_label: issue.priority.label().to_string(),
            priority_color: issue.priority.color(),
            status,
            status_label: status.label().to_string(),
            raised_at: issue.raised_at,
            deadline,
            overdue: is_overdue(deadline, issue.acknowledged_at, issue.resolved_at, now),
            approaching_deadline: awaiting_response
                && is_approaching_deadline(deadline, issue.raised_at, now),
            time_remaining: awaiting_response.then(|| format_time_remaining(deadline, now)),
            response_time_hours: response_time_hours(issue.raised_at, issue.acknowledged_at),
            resolution_time_days: resolution_time_days(issue.raised_at, issue.resolved_at),
            evaluated_at: now,
        }
    }

    /// Whether the first response met the deadline. `None` while an issue
    /// is unanswered and its window is still open.
    pub fn within_sla_at(&self, issue: &Issue, now: DateTime<Utc>) -> Option<bool> {
        let deadline = self.deadline_for(issue);
        match issue.acknowledged_at.or(issue.resolved_at) {
            Some(responded) => Some(responded <= deadline),
            None if now > deadline => Some(false),
            None => None,
        }
    }

    pub fn compliance(&self, issues: &[Issue], target_hours: u32) -> ComplianceSnapshot {
        self.compliance_at(issues, target_hours, self.clock.now())
    }

    pub fn compliance_at(
        &self,
        issues: &[Issue],
        target_hours: u32,
        now: DateTime<Utc>,
    ) -> ComplianceSnapshot {
        let mut tally = ComplianceTally::default();

        for issue in issues {
            tally.record(
                issue.priority,
                self.within_sla_at(issue, now),
                response_time_hours(issue.raised_at, issue.acknowledged_at),
            );

            let deadline = self.deadline_for(issue);
            if is_overdue(deadline, issue.acknowledged_at, issue.resolved_at, now) {
                tally.flag_overdue(issue.id.clone());
            }
        }

        tally.snapshot(target_hours)
    }
}
