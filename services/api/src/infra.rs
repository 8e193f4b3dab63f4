use chrono::{DateTime, Utc};
use clap::Args;
use lettings_sla::sla::{IssuePriority, SlaConfiguration};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Per-invocation overrides of the configured agency budgets.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct SlaArgs {
    /// Emergency response budget in hours
    #[arg(long)]
    pub(crate) emergency_hours: Option<u32>,
    /// Urgent response budget in hours
    #[arg(long)]
    pub(crate) urgent_hours: Option<u32>,
    /// Routine response budget in hours
    #[arg(long)]
    pub(crate) routine_hours: Option<u32>,
    /// Low priority response budget in calendar days
    #[arg(long)]
    pub(crate) maintenance_days: Option<u32>,
}

impl SlaArgs {
    pub(crate) fn apply(&self, base: SlaConfiguration) -> SlaConfiguration {
        SlaConfiguration {
            emergency_response_hours: self
                .emergency_hours
                .unwrap_or(base.emergency_response_hours),
            urgent_response_hours: self.urgent_hours.unwrap_or(base.urgent_response_hours),
            routine_response_hours: self.routine_hours.unwrap_or(base.routine_response_hours),
            maintenance_response_days: self
                .maintenance_days
                .unwrap_or(base.maintenance_response_days),
        }
    }
}

pub(crate) fn parse_priority(raw: &str) -> Result<IssuePriority, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    lettings_sla::sla::parse_timestamp(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}
