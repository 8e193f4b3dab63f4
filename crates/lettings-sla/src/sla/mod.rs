pub mod clock;
pub mod compliance;
pub mod deadline;
pub mod domain;
mod engine;
pub mod evaluator;
pub mod import;
pub mod report;
pub mod router;

#[cfg(test)]
mod tests;

pub use clock::{parse_timestamp, Clock, FixedClock, SystemClock};
pub use domain::{
    ColorTier, Issue, IssueId, IssuePriority, IssueStatus, SlaConfigError, SlaConfiguration,
    UnknownPriority,
};
pub use engine::{IssueSlaSnapshot, SlaEngine};
pub use import::{IssueImportError, IssueLogImporter};
pub use report::{ComplianceSnapshot, PriorityBreakdown};
pub use router::sla_router;
