use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum.
///
/// Shared by validator, repository and moderation surface so illegal status
/// strings are rejected at the boundary instead of travelling as opaque text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReportStatus {
    /// Permanent deletion is reachable only from `rejected`. Moderators must
    /// reject a report before they may remove it.
    pub fn is_deletable(self) -> bool {
        matches!(self, ReportStatus::Rejected)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Approved => write!(f, "approved"),
            ReportStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Issue category enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Pothole,
    Streetlight,
    TrafficSignal,
    OpenDrainage,
}

impl IssueCategory {
    /// Human-readable description of an impact level within this category.
    ///
    /// The raw integer carries no cross-category ordering; the meaning of
    /// "level 2" for a streetlight is unrelated to "level 2" for a pothole.
    /// The match is exhaustive over both enums, so every pairing has a
    /// description by construction.
    pub fn impact_description(self, level: ImpactLevel) -> &'static str {
        match (self, level) {
            (IssueCategory::Pothole, ImpactLevel::Low) => "Minor surface damage",
            (IssueCategory::Pothole, ImpactLevel::Medium) => "Moderate dip / uneven road",
            (IssueCategory::Pothole, ImpactLevel::High) => "Severe accident-prone pothole",
            (IssueCategory::Streetlight, ImpactLevel::Low) => "Flickering occasionally",
            (IssueCategory::Streetlight, ImpactLevel::Medium) => "Often off or unstable",
            (IssueCategory::Streetlight, ImpactLevel::High) => "Completely not working",
            (IssueCategory::TrafficSignal, ImpactLevel::Low) => "Responding with delay",
            (IssueCategory::TrafficSignal, ImpactLevel::Medium) => "Stuck on one color",
            (IssueCategory::TrafficSignal, ImpactLevel::High) => "Not functioning",
            (IssueCategory::OpenDrainage, ImpactLevel::Low) => "Partially open drain",
            (IssueCategory::OpenDrainage, ImpactLevel::Medium) => "Fully open drain",
            (IssueCategory::OpenDrainage, ImpactLevel::High) => "Dangerous open drainage",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueCategory::Pothole => write!(f, "pothole"),
            IssueCategory::Streetlight => write!(f, "streetlight"),
            IssueCategory::TrafficSignal => write!(f, "traffic_signal"),
            IssueCategory::OpenDrainage => write!(f, "open_drainage"),
        }
    }
}

impl std::str::FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pothole" => Ok(IssueCategory::Pothole),
            "streetlight" => Ok(IssueCategory::Streetlight),
            "traffic_signal" => Ok(IssueCategory::TrafficSignal),
            "open_drainage" => Ok(IssueCategory::OpenDrainage),
            other => Err(format!("unknown issue category: {}", other)),
        }
    }
}

/// Impact level stored as SMALLINT, exposed on the wire as its raw integer.
///
/// Parsing goes through [`TryFrom<i16>`] so anything outside {1,2,3} fails
/// fast instead of reaching the database check constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum ImpactLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl TryFrom<i16> for ImpactLevel {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ImpactLevel::Low),
            2 => Ok(ImpactLevel::Medium),
            3 => Ok(ImpactLevel::High),
            other => Err(format!("impact level must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl From<ImpactLevel> for i16 {
    fn from(level: ImpactLevel) -> Self {
        level as i16
    }
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i16)
    }
}

/// Database model for a citizen report.
///
/// `status` is the only mutable column; everything else is write-once at
/// insert time.
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub image_url: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub category: IssueCategory,
    pub impact_level: ImpactLevel,
    pub governing_body: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a new report. The server assigns id, status and
/// created_at; `governing_body` is filled by the pipeline, never the client.
#[derive(Debug)]
pub struct NewReport {
    pub image_url: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub category: IssueCategory,
    pub impact_level: ImpactLevel,
    pub governing_body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_rejects_unknown_values() {
        assert_eq!(
            serde_json::from_str::<ReportStatus>("\"approved\"").unwrap(),
            ReportStatus::Approved
        );
        assert!(serde_json::from_str::<ReportStatus>("\"verified\"").is_err());
        assert!(serde_json::from_str::<ReportStatus>("\"Approved\"").is_err());
    }

    #[test]
    fn test_category_serde_snake_case() {
        assert_eq!(
            serde_json::from_str::<IssueCategory>("\"traffic_signal\"").unwrap(),
            IssueCategory::TrafficSignal
        );
        assert!(serde_json::from_str::<IssueCategory>("\"sinkhole\"").is_err());
    }

    #[test]
    fn test_impact_level_parses_only_declared_values() {
        assert_eq!(ImpactLevel::try_from(1), Ok(ImpactLevel::Low));
        assert_eq!(ImpactLevel::try_from(3), Ok(ImpactLevel::High));
        assert!(ImpactLevel::try_from(0).is_err());
        assert!(ImpactLevel::try_from(4).is_err());
        assert!(ImpactLevel::try_from(-2).is_err());

        // wire format is the raw integer, not a variant name
        assert_eq!(serde_json::to_string(&ImpactLevel::Medium).unwrap(), "2");
        assert_eq!(
            serde_json::from_str::<ImpactLevel>("3").unwrap(),
            ImpactLevel::High
        );
        assert!(serde_json::from_str::<ImpactLevel>("5").is_err());
    }

    #[test]
    fn test_only_rejected_reports_are_deletable() {
        assert!(!ReportStatus::Pending.is_deletable());
        assert!(!ReportStatus::Approved.is_deletable());
        assert!(ReportStatus::Rejected.is_deletable());
    }

    #[test]
    fn test_impact_description_covers_every_pairing() {
        let categories = [
            IssueCategory::Pothole,
            IssueCategory::Streetlight,
            IssueCategory::TrafficSignal,
            IssueCategory::OpenDrainage,
        ];
        for category in categories {
            for level in [ImpactLevel::Low, ImpactLevel::Medium, ImpactLevel::High] {
                let description = category.impact_description(level);
                assert!(
                    !description.is_empty(),
                    "missing description for {}/{}",
                    category,
                    level
                );
            }
        }
    }

    #[test]
    fn test_impact_description_is_category_scoped() {
        // The same level must not read the same across categories
        assert_ne!(
            IssueCategory::Pothole.impact_description(ImpactLevel::High),
            IssueCategory::Streetlight.impact_description(ImpactLevel::High)
        );
    }
}
