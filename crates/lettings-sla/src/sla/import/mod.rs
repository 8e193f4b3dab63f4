//! Import of issue-store CSV exports.

mod parser;

use super::domain::{Issue, IssueId, IssuePriority};
use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::Path;

use super::clock::parse_timestamp;
use parser::IssueRow;

#[derive(Debug)]
pub enum IssueImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for IssueImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueImportError::Io(err) => write!(f, "failed to read issue export: {}", err),
            IssueImportError::Csv(err) => write!(f, "invalid issue CSV data: {}", err),
            IssueImportError::InvalidRow { line, reason } => {
                write!(f, "issue export line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for IssueImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IssueImportError::Io(err) => Some(err),
            IssueImportError::Csv(err) => Some(err),
            IssueImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for IssueImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IssueImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct IssueLogImporter;

impl IssueLogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Issue>, IssueImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Issue>, IssueImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .enumerate()
            // header occupies line 1
            .map(|(index, row)| issue_from_row(index + 2, row))
            .collect()
    }
}

fn issue_from_row(line: usize, row: IssueRow) -> Result<Issue, IssueImportError> {
    let invalid = |reason: String| IssueImportError::InvalidRow { line, reason };

    if row.id.is_empty() {
        return Err(invalid("missing Issue ID".to_string()));
    }

    let priority: IssuePriority = row.priority.parse().map_err(|err| invalid(format!("{err}")))?;
    let raised_at = parse_timestamp(&row.raised_at)
        .ok_or_else(|| invalid(format!("unreadable Raised At '{}'", row.raised_at)))?;

    let optional = |value: Option<String>, column: &str| -> Result<Option<DateTime<Utc>>, IssueImportError> {
        value
            .map(|raw| {
                parse_timestamp(&raw)
                    .ok_or_else(|| invalid(format!("unreadable {column} '{raw}'")))
            })
            .transpose()
    };

    Ok(Issue {
        id: IssueId(row.id),
        priority,
        raised_at,
        acknowledged_at: optional(row.acknowledged_at, "Acknowledged At")?,
        resolved_at: optional(row.resolved_at, "Resolved At")?,
    })
}
