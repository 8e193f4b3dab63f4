use crate::demo::{
    run_compliance_report, run_demo, run_issue_status, ComplianceReportArgs, DemoArgs,
    IssueStatusArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lettings_sla::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lettings SLA Service",
    about = "Evaluate maintenance issue SLAs and agency response compliance",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the SLA state of a single issue
    Issue {
        #[command(subcommand)]
        command: IssueCommand,
    },
    /// Summarise an agency's response compliance
    Compliance {
        #[command(subcommand)]
        command: ComplianceCommand,
    },
    /// Walk through a sample agency portfolio
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum IssueCommand {
    /// Show deadline, overdue state and time remaining for one issue
    Status(IssueStatusArgs),
}

#[derive(Subcommand, Debug)]
enum ComplianceCommand {
    /// Build a compliance report from an issue-store CSV export
    Report(ComplianceReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Issue {
            command: IssueCommand::Status(args),
        } => run_issue_status(args),
        Command::Compliance {
            command: ComplianceCommand::Report(args),
        } => run_compliance_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["lettings-sla-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_issue_status_arguments() {
        let cli = Cli::try_parse_from([
            "lettings-sla-api",
            "issue",
            "status",
            "--priority",
            "urgent",
            "--raised-at",
            "2025-01-01T00:00:00Z",
            "--emergency-hours",
            "2",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Issue {
                command: IssueCommand::Status(args),
            }) => {
                assert_eq!(args.priority, lettings_sla::sla::IssuePriority::Urgent);
                assert_eq!(args.sla.emergency_hours, Some(2));
                assert!(args.acknowledged_at.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_priority() {
        let result = Cli::try_parse_from([
            "lettings-sla-api",
            "issue",
            "status",
            "--priority",
            "whenever",
            "--raised-at",
            "2025-01-01",
        ]);
        assert!(result.is_err());
    }
}
