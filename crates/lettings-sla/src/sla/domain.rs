use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity tier of a maintenance issue. Ordered most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Emergency,
    Urgent,
    Routine,
    Low,
}

impl IssuePriority {
    pub const fn ordered() -> [Self; 4] {
        [Self::Emergency, Self::Urgent, Self::Routine, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Emergency => "Emergency",
            Self::Urgent => "Urgent",
            Self::Routine => "Routine",
            Self::Low => "Low",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "emergency",
            Self::Urgent => "urgent",
            Self::Routine => "routine",
            Self::Low => "low",
        }
    }

    /// Badge color used when listing issues.
    pub const fn color(self) -> ColorTier {
        match self {
            Self::Emergency => ColorTier::Danger,
            Self::Urgent => ColorTier::Warning,
            Self::Routine => ColorTier::Info,
            Self::Low => ColorTier::Muted,
        }
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown issue priority '{0}' (expected emergency, urgent, routine or low)")]
pub struct UnknownPriority(pub String);

impl FromStr for IssuePriority {
    type Err = UnknownPriority;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "emergency" => Ok(Self::Emergency),
            "urgent" => Ok(Self::Urgent),
            "routine" => Ok(Self::Routine),
            "low" => Ok(Self::Low),
            _ => Err(UnknownPriority(value.to_string())),
        }
    }
}

/// Color tiers shared by compliance badges and priority chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTier {
    Success,
    Warning,
    Danger,
    Info,
    Muted,
}

impl ColorTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
            Self::Info => "Info",
            Self::Muted => "Muted",
        }
    }
}

/// Response budgets an agency commits to, per priority tier.
///
/// `low` priority issues are budgeted in calendar days rather than hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaConfiguration {
    #[serde(alias = "emergencyResponseHours")]
    pub emergency_response_hours: u32,
    #[serde(alias = "urgentResponseHours")]
    pub urgent_response_hours: u32,
    #[serde(alias = "routineResponseHours")]
    pub routine_response_hours: u32,
    #[serde(alias = "maintenanceResponseDays")]
    pub maintenance_response_days: u32,
}

impl Default for SlaConfiguration {
    fn default() -> Self {
        Self {
            emergency_response_hours: 4,
            urgent_response_hours: 24,
            routine_response_hours: 72,
            maintenance_response_days: 14,
        }
    }
}

impl SlaConfiguration {
    /// Check that every budget is positive. Called where configurations
    /// enter the system; the calculators assume it has already passed.
    pub fn validate(&self) -> Result<(), SlaConfigError> {
        let budgets = [
            ("emergency_response_hours", self.emergency_response_hours),
            ("urgent_response_hours", self.urgent_response_hours),
            ("routine_response_hours", self.routine_response_hours),
            ("maintenance_response_days", self.maintenance_response_days),
        ];

        match budgets.into_iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(SlaConfigError::NonPositiveBudget { field }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlaConfigError {
    #[error("SLA budget {field} must be a positive integer")]
    NonPositiveBudget { field: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub String);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maintenance issue as read from the issue store. Never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: IssueId,
    pub priority: IssuePriority,
    pub raised_at: DateTime<Utc>,
    #[serde(default)]
    pub acknowledged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn raised(id: impl Into<String>, priority: IssuePriority, raised_at: DateTime<Utc>) -> Self {
        Self {
            id: IssueId(id.into()),
            priority,
            raised_at,
            acknowledged_at: None,
            resolved_at: None,
        }
    }

    pub fn acknowledged(mut self, at: DateTime<Utc>) -> Self {
        self.acknowledged_at = Some(at);
        self
    }

    pub fn resolved(mut self, at: DateTime<Utc>) -> Self {
        self.resolved_at = Some(at);
        self
    }

    pub fn status(&self) -> IssueStatus {
        match (self.acknowledged_at, self.resolved_at) {
            (_, Some(_)) => IssueStatus::Resolved,
            (Some(_), None) => IssueStatus::Acknowledged,
            (None, None) => IssueStatus::Open,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    Acknowledged,
    Resolved,
}

impl IssueStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Acknowledged => "Acknowledged",
            Self::Resolved => "Resolved",
        }
    }
}
