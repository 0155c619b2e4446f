use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::photos::models::PhotoCategory;
use crate::features::photos::services::{
    DanglingPhoto, DanglingReason, OrphanReport, RepairReport, SweepReport,
};
use crate::shared::validation::validate_http_url;

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct OrphanReportQuery {
    /// Also probe image URLs hosted outside the bucket (slow)
    #[serde(default)]
    pub check_external: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrphanedObjectDto {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DanglingReasonDto {
    MissingObject,
    Unreachable,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DanglingPhotoDto {
    pub id: Uuid,
    pub category: PhotoCategory,
    pub image_url: String,
    pub display_order: i32,
    pub reason: DanglingReasonDto,
}

impl From<DanglingPhoto> for DanglingPhotoDto {
    fn from(dangling: DanglingPhoto) -> Self {
        Self {
            id: dangling.photo.id,
            category: dangling.photo.category,
            image_url: dangling.photo.image_url,
            display_order: dangling.photo.display_order,
            reason: match dangling.reason {
                DanglingReason::MissingObject => DanglingReasonDto::MissingObject,
                DanglingReason::Unreachable => DanglingReasonDto::Unreachable,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrphanReportDto {
    pub orphaned_objects: Vec<OrphanedObjectDto>,
    pub dangling_photos: Vec<DanglingPhotoDto>,
}

impl From<OrphanReport> for OrphanReportDto {
    fn from(report: OrphanReport) -> Self {
        Self {
            orphaned_objects: report
                .orphaned_objects
                .into_iter()
                .map(|o| OrphanedObjectDto {
                    key: o.key,
                    size: o.size,
                    last_modified: o.last_modified,
                })
                .collect(),
            dangling_photos: report.dangling_photos.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_dry_run() -> bool {
    true
}

/// Request DTO for an orphan sweep. Dry run unless `dry_run` is false.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SweepOrphansDto {
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SweepReportDto {
    pub dry_run: bool,
    pub keys: Vec<String>,
    pub skipped_recent: usize,
}

impl From<SweepReport> for SweepReportDto {
    fn from(report: SweepReport) -> Self {
        Self {
            dry_run: report.dry_run,
            keys: report.keys,
            skipped_recent: report.skipped_recent,
        }
    }
}

fn validate_candidates(
    candidates: &HashMap<PhotoCategory, Vec<String>>,
) -> Result<(), ValidationError> {
    candidates
        .values()
        .flatten()
        .try_for_each(|url| validate_http_url(url))
}

/// Request DTO for repointing dangling photos at replacement images
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RepairUrlsDto {
    /// Replacement URLs per category, picked by display order
    #[validate(custom(function = "validate_candidates"))]
    pub candidates: HashMap<PhotoCategory, Vec<String>>,
    #[serde(default)]
    pub check_external: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RepairedPhotoDto {
    pub id: Uuid,
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RepairReportDto {
    pub repaired: Vec<RepairedPhotoDto>,
    /// Photos whose category had no candidates
    pub skipped: Vec<Uuid>,
}

impl From<RepairReport> for RepairReportDto {
    fn from(report: RepairReport) -> Self {
        Self {
            repaired: report
                .repaired
                .into_iter()
                .map(|(id, image_url)| RepairedPhotoDto { id, image_url })
                .collect(),
            skipped: report.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_defaults_to_dry_run() {
        let dto: SweepOrphansDto = serde_json::from_str("{}").unwrap();
        assert!(dto.dry_run);
    }

    #[test]
    fn test_repair_rejects_relative_candidates() {
        let dto: RepairUrlsDto =
            serde_json::from_str(r#"{"candidates":{"hero":["/static/hero.jpg"]}}"#).unwrap();
        assert!(dto.validate().is_err());

        let dto: RepairUrlsDto = serde_json::from_str(
            r#"{"candidates":{"store_photo":["https://cdn.example.com/a.jpg"]}}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert!(!dto.check_external);
    }
}
