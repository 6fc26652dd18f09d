mod report;

pub use report::{ImpactLevel, IssueCategory, NewReport, Report, ReportStatus};
