use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{ImpactLevel, IssueCategory, Report, ReportStatus};
use crate::shared::validation::is_image_content_type;

/// Maximum report image size in bytes (10 MiB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Create report request DTO for OpenAPI documentation.
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateReportDto {
    /// Photo of the issue (jpeg, png, webp or gif, max 10 MiB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
    /// Human-readable address or free-text location
    #[schema(example = "Near Airport Gate")]
    pub location: String,
    /// Latitude (finite number; 0 is valid)
    #[schema(example = "26.1062")]
    pub lat: String,
    /// Longitude (finite number; 0 is valid)
    #[schema(example = "91.5859")]
    pub lng: String,
    /// Impact level 1-3, scoped by category. "severity" is accepted as an
    /// alias for older clients.
    #[schema(example = "3")]
    pub impact_level: String,
    /// Issue category (defaults to "pothole")
    #[schema(example = "streetlight")]
    pub category: Option<String>,
}

/// Image blob as it arrived in the multipart payload
#[derive(Debug)]
pub struct ImagePart {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Multipart fields as collected, before any validation
#[derive(Debug, Default)]
pub struct RawSubmission {
    pub image: Option<ImagePart>,
    pub location: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub impact_level: Option<String>,
    pub category: Option<String>,
}

/// A submission that passed every check. Nothing has been uploaded or
/// inserted yet; constructing this type is free of side effects.
#[derive(Debug)]
pub struct ValidatedSubmission {
    pub image: ImagePart,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub category: IssueCategory,
    pub impact_level: ImpactLevel,
}

impl RawSubmission {
    /// Validate the collected fields.
    ///
    /// Numeric checks use "parses to a finite number", never truthiness: a
    /// coordinate or level of exactly 0 must not read as missing.
    pub fn validate(self) -> Result<ValidatedSubmission> {
        let image = self
            .image
            .ok_or_else(|| AppError::Validation("image is required".to_string()))?;

        let location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .ok_or_else(|| AppError::Validation("location is required".to_string()))?;

        let lat = parse_finite("lat", self.lat)?;
        let lng = parse_finite("lng", self.lng)?;

        let impact_raw = self
            .impact_level
            .ok_or_else(|| AppError::Validation("impact_level is required".to_string()))?;
        let impact_level: ImpactLevel = impact_raw
            .trim()
            .parse::<i16>()
            .map_err(|_| AppError::Validation("impact_level must be an integer".to_string()))
            .and_then(|v| ImpactLevel::try_from(v).map_err(AppError::Validation))?;

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => IssueCategory::Pothole,
            Some(raw) => raw.parse::<IssueCategory>().map_err(AppError::Validation)?,
        };

        if !is_image_content_type(&image.content_type) {
            return Err(AppError::Validation(format!(
                "Unsupported image type: {}",
                image.content_type
            )));
        }

        if image.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::PayloadTooLarge(
                "Please upload an image smaller than 10MB".to_string(),
            ));
        }

        Ok(ValidatedSubmission {
            image,
            location,
            lat,
            lng,
            category,
            impact_level,
        })
    }
}

fn parse_finite(field: &str, value: Option<String>) -> Result<f64> {
    let raw = value.ok_or_else(|| AppError::Validation(format!("{} is required", field)))?;
    let parsed: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a number", field)))?;

    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(AppError::Validation(format!(
            "{} must be a finite number",
            field
        )))
    }
}

/// Response DTO for a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub image_url: String,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub category: IssueCategory,
    #[schema(value_type = i16, minimum = 1, maximum = 3)]
    pub impact_level: ImpactLevel,
    /// Category-scoped description of the impact level
    pub impact_description: String,
    pub governing_body: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            image_url: r.image_url,
            location: r.location,
            lat: r.lat,
            lng: r.lng,
            category: r.category,
            impact_level: r.impact_level,
            impact_description: r.category.impact_description(r.impact_level).to_string(),
            governing_body: r.governing_body,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

/// Request DTO for updating report status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_jpeg() -> ImagePart {
        ImagePart {
            data: vec![0xFF, 0xD8, 0xFF, 0xE0],
            content_type: "image/jpeg".to_string(),
        }
    }

    fn full_submission() -> RawSubmission {
        RawSubmission {
            image: Some(small_jpeg()),
            location: Some("Near Airport Gate".to_string()),
            lat: Some("26.1062".to_string()),
            lng: Some("91.5859".to_string()),
            impact_level: Some("3".to_string()),
            category: Some("streetlight".to_string()),
        }
    }

    #[test]
    fn test_valid_submission_passes() {
        let v = full_submission().validate().unwrap();
        assert_eq!(v.location, "Near Airport Gate");
        assert_eq!(v.category, IssueCategory::Streetlight);
        assert_eq!(v.impact_level, ImpactLevel::High);
        assert!((v.lat - 26.1062).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_coordinates_are_valid() {
        // Regression: 0 parses as a legitimate coordinate, not a missing one
        let mut raw = full_submission();
        raw.lat = Some("0".to_string());
        raw.lng = Some("0".to_string());

        let v = raw.validate().unwrap();
        assert_eq!(v.lat, 0.0);
        assert_eq!(v.lng, 0.0);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut raw = full_submission();
        raw.image = None;
        assert!(matches!(
            raw.validate().unwrap_err(),
            AppError::Validation(_)
        ));

        let mut raw = full_submission();
        raw.location = Some("   ".to_string());
        assert!(matches!(
            raw.validate().unwrap_err(),
            AppError::Validation(_)
        ));

        let mut raw = full_submission();
        raw.lng = None;
        assert!(matches!(
            raw.validate().unwrap_err(),
            AppError::Validation(_)
        ));

        let mut raw = full_submission();
        raw.impact_level = None;
        assert!(matches!(
            raw.validate().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        for bad in ["abc", "NaN", "inf", "-inf", ""] {
            let mut raw = full_submission();
            raw.lat = Some(bad.to_string());
            assert!(
                matches!(raw.validate().unwrap_err(), AppError::Validation(_)),
                "lat {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_impact_level_outside_vocabulary_is_rejected() {
        for bad in ["0", "4", "1.5", "high", "-1"] {
            let mut raw = full_submission();
            raw.impact_level = Some(bad.to_string());
            assert!(
                matches!(raw.validate().unwrap_err(), AppError::Validation(_)),
                "impact_level {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_unknown_category_is_rejected_and_absent_defaults() {
        let mut raw = full_submission();
        raw.category = Some("sinkhole".to_string());
        assert!(matches!(
            raw.validate().unwrap_err(),
            AppError::Validation(_)
        ));

        let mut raw = full_submission();
        raw.category = None;
        assert_eq!(raw.validate().unwrap().category, IssueCategory::Pothole);
    }

    #[test]
    fn test_non_image_content_type_is_rejected() {
        let mut raw = full_submission();
        raw.image = Some(ImagePart {
            data: vec![1, 2, 3],
            content_type: "application/pdf".to_string(),
        });
        assert!(matches!(
            raw.validate().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_image_over_ceiling_is_rejected_with_size_error() {
        let mut raw = full_submission();
        raw.image = Some(ImagePart {
            data: vec![0u8; MAX_IMAGE_SIZE + 1],
            content_type: "image/jpeg".to_string(),
        });
        assert!(matches!(
            raw.validate().unwrap_err(),
            AppError::PayloadTooLarge(_)
        ));

        // exactly at the ceiling is fine
        let mut raw = full_submission();
        raw.image = Some(ImagePart {
            data: vec![0u8; MAX_IMAGE_SIZE],
            content_type: "image/jpeg".to_string(),
        });
        assert!(raw.validate().is_ok());
    }
}
