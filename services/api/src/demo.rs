use crate::infra::{parse_priority, parse_timestamp, SlaArgs};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use lettings_sla::config::AppConfig;
use lettings_sla::error::AppError;
use lettings_sla::sla::{
    ComplianceSnapshot, Issue, IssueLogImporter, IssuePriority, IssueSlaSnapshot,
    SlaConfiguration, SlaEngine, SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct IssueStatusArgs {
    /// Issue priority (emergency, urgent, routine, low)
    #[arg(long, value_parser = parse_priority)]
    pub(crate) priority: IssuePriority,
    /// When the issue was raised (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) raised_at: DateTime<Utc>,
    /// When the agency first responded
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) acknowledged_at: Option<DateTime<Utc>>,
    /// When the issue was closed
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) resolved_at: Option<DateTime<Utc>>,
    /// Evaluate as of this instant instead of the system clock
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Identifier echoed in the output
    #[arg(long, default_value = "cli-issue")]
    pub(crate) issue_id: String,
    #[command(flatten)]
    pub(crate) sla: SlaArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ComplianceReportArgs {
    /// Issue-store CSV export (Issue ID, Priority, Raised At, Acknowledged At, Resolved At)
    #[arg(long)]
    pub(crate) issues_csv: PathBuf,
    /// Headline response target in hours (defaults to the emergency budget)
    #[arg(long)]
    pub(crate) target_hours: Option<u32>,
    /// Evaluate as of this instant instead of the system clock
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the SLA state of every imported issue
    #[arg(long)]
    pub(crate) list_issues: bool,
    #[command(flatten)]
    pub(crate) sla: SlaArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Anchor the sample portfolio at this instant (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    #[command(flatten)]
    pub(crate) sla: SlaArgs,
}

fn build_engine(overrides: &SlaArgs) -> Result<SlaEngine<SystemClock>, AppError> {
    let app_config = AppConfig::load()?;
    let config = overrides.apply(app_config.default_sla);
    config.validate()?;
    Ok(SlaEngine::new(config, Arc::new(SystemClock)).with_time_zone(app_config.time_zone))
}

pub(crate) fn run_issue_status(args: IssueStatusArgs) -> Result<(), AppError> {
    let engine = build_engine(&args.sla)?;
    let issue = Issue {
        id: lettings_sla::sla::IssueId(args.issue_id),
        priority: args.priority,
        raised_at: args.raised_at,
        acknowledged_at: args.acknowledged_at,
        resolved_at: args.resolved_at,
    };

    let now = args.now.unwrap_or_else(|| engine.now());
    let snapshot = engine.evaluate_at(&issue, now);
    render_issue_snapshot(&snapshot);
    Ok(())
}

pub(crate) fn run_compliance_report(args: ComplianceReportArgs) -> Result<(), AppError> {
    let engine = build_engine(&args.sla)?;
    let issues = IssueLogImporter::from_path(&args.issues_csv)?;

    let now = args.now.unwrap_or_else(|| engine.now());
    let target_hours = args
        .target_hours
        .unwrap_or(engine.config().emergency_response_hours);
    let snapshot = engine.compliance_at(&issues, target_hours, now);

    println!("Compliance report");
    println!(
        "Source: {} ({} issues, evaluated {})",
        args.issues_csv.display(),
        issues.len(),
        now.to_rfc3339()
    );
    render_compliance(engine.config(), &snapshot);

    if args.list_issues {
        println!("\nIssues");
        for issue in &issues {
            render_issue_line(&engine.evaluate_at(issue, now));
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = build_engine(&args.sla)?;
    let now = args.now.unwrap_or_else(|| engine.now());
    let issues = sample_portfolio(now);

    println!("Issue SLA demo");
    println!("Evaluated at {}", now.to_rfc3339());

    println!("\nOpen and recent issues");
    for issue in &issues {
        render_issue_line(&engine.evaluate_at(issue, now));
    }

    let target_hours = engine.config().emergency_response_hours;
    let snapshot = engine.compliance_at(&issues, target_hours, now);
    println!();
    render_compliance(engine.config(), &snapshot);

    Ok(())
}

/// Portfolio covering each priority and each lifecycle stage.
pub(crate) fn sample_portfolio(now: DateTime<Utc>) -> Vec<Issue> {
    let ago = |hours: i64| now - Duration::hours(hours);

    vec![
        Issue::raised("ISS-001", IssuePriority::Emergency, ago(3)),
        Issue::raised("ISS-002", IssuePriority::Emergency, ago(30))
            .acknowledged(ago(29))
            .resolved(ago(20)),
        Issue::raised("ISS-003", IssuePriority::Urgent, ago(40)),
        Issue::raised("ISS-004", IssuePriority::Urgent, ago(50))
            .acknowledged(ago(10))
            .resolved(ago(2)),
        Issue::raised("ISS-005", IssuePriority::Routine, ago(60)),
        Issue::raised("ISS-006", IssuePriority::Routine, ago(100)).acknowledged(ago(80)),
        Issue::raised("ISS-007", IssuePriority::Low, ago(24 * 5)),
    ]
}

fn render_issue_snapshot(snapshot: &IssueSlaSnapshot) {
    println!("Issue {}", snapshot.issue_id);
    println!(
        "Priority: {} ({})",
        snapshot.priority_label,
        snapshot.priority_color.label()
    );
    println!("Status: {}", snapshot.status_label);
    println!("Raised: {}", snapshot.raised_at.to_rfc3339());
    println!("Deadline: {}", snapshot.deadline.to_rfc3339());
    println!("Overdue: {}", if snapshot.overdue { "yes" } else { "no" });

    if let Some(remaining) = &snapshot.time_remaining {
        println!("Time remaining: {remaining}");
    }
    if snapshot.approaching_deadline {
        println!("Approaching deadline: final quarter of the response window");
    }
    if let Some(hours) = snapshot.response_time_hours {
        println!("Response time: {hours:.1}h");
    }
    if let Some(days) = snapshot.resolution_time_days {
        println!("Resolution time: {days:.1} days");
    }
}

fn render_issue_line(snapshot: &IssueSlaSnapshot) {
    let state = match (&snapshot.time_remaining, snapshot.overdue) {
        (Some(remaining), _) => remaining.clone(),
        (None, true) => "responded late".to_string(),
        (None, false) => "responded in time".to_string(),
    };
    let flag = if snapshot.approaching_deadline {
        " [approaching]"
    } else {
        ""
    };

    println!(
        "- {} | {} | {} | due {} | {}{}",
        snapshot.issue_id,
        snapshot.priority_label,
        snapshot.status_label,
        snapshot.deadline.to_rfc3339(),
        state,
        flag
    );
}

fn render_compliance(config: &SlaConfiguration, snapshot: &ComplianceSnapshot) {
    println!(
        "SLA budgets: emergency {}h, urgent {}h, routine {}h, low {} days",
        config.emergency_response_hours,
        config.urgent_response_hours,
        config.routine_response_hours,
        config.maintenance_response_days
    );
    println!(
        "Compliance: {:.1}% ({}/{} decided issues within SLA) [{}]",
        snapshot.compliance_rate,
        snapshot.within_sla,
        snapshot.total_raised,
        snapshot.color.label()
    );
    println!(
        "Average response: {:.1}h",
        snapshot.average_response_hours
    );
    println!("Profile text: {}", snapshot.display.text);

    if !snapshot.by_priority.is_empty() {
        println!("\nBy priority");
        for row in &snapshot.by_priority {
            println!(
                "- {}: {}/{} within SLA ({:.1}%)",
                row.priority_label, row.within_sla, row.raised, row.compliance_rate
            );
        }
    }

    if snapshot.overdue_issues.is_empty() {
        println!("\nOverdue issues: none");
    } else {
        println!("\nOverdue issues");
        for id in &snapshot.overdue_issues {
            println!("- {id}");
        }
    }
}
