use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::photos::models::{Photo, PhotoCategory, PhotoChanges};
use crate::features::photos::repositories::PhotoRepository;
use crate::features::photos::services::selection::select_candidate;
use crate::modules::storage::{ObjectStore, StoredObject, UrlProbe};

/// Objects younger than this may belong to a create whose row is not inserted yet
const SWEEP_GRACE_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanglingReason {
    /// Managed-bucket URL whose object no longer exists
    MissingObject,
    /// External URL that did not answer a HEAD request
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct DanglingPhoto {
    pub photo: Photo,
    pub reason: DanglingReason,
}

#[derive(Debug, Clone, Default)]
pub struct OrphanReport {
    pub orphaned_objects: Vec<StoredObject>,
    pub dangling_photos: Vec<DanglingPhoto>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub dry_run: bool,
    /// Keys removed, or that would be removed on a dry run
    pub keys: Vec<String>,
    /// Orphans left alone because they are inside the grace period
    pub skipped_recent: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairReport {
    pub repaired: Vec<(Uuid, String)>,
    /// Dangling photos whose category had no replacement candidates
    pub skipped: Vec<Uuid>,
}

/// Reconciles the bucket with the photo table
pub struct PhotoMaintenanceService {
    store: Arc<dyn ObjectStore>,
    repository: Arc<dyn PhotoRepository>,
    probe: Arc<dyn UrlProbe>,
}

impl PhotoMaintenanceService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        repository: Arc<dyn PhotoRepository>,
        probe: Arc<dyn UrlProbe>,
    ) -> Self {
        Self {
            store,
            repository,
            probe,
        }
    }

    /// Objects without a row, and rows whose image is gone.
    ///
    /// External URLs are only probed when `check_external` is set.
    pub async fn orphan_report(&self, check_external: bool) -> Result<OrphanReport> {
        let prefix = format!("{}/", self.store.key_prefix());
        let objects = self.store.list(&prefix).await?;
        let photos = self.repository.list_all().await?;

        let stored: HashSet<&str> = objects.iter().map(|o| o.key.as_str()).collect();
        let mut referenced = HashSet::new();
        let mut dangling_photos = Vec::new();

        for photo in &photos {
            match self.store.key_from_url(&photo.image_url) {
                Some(key) => {
                    if !stored.contains(key.as_str()) {
                        dangling_photos.push(DanglingPhoto {
                            photo: photo.clone(),
                            reason: DanglingReason::MissingObject,
                        });
                    }
                    referenced.insert(key);
                }
                None if check_external => {
                    if !self.probe.is_reachable(&photo.image_url).await {
                        dangling_photos.push(DanglingPhoto {
                            photo: photo.clone(),
                            reason: DanglingReason::Unreachable,
                        });
                    }
                }
                None => {}
            }
        }

        let orphaned_objects: Vec<StoredObject> = objects
            .iter()
            .filter(|o| !referenced.contains(&o.key))
            .cloned()
            .collect();

        info!(
            "Orphan report: {} objects, {} photos, {} orphaned, {} dangling",
            objects.len(),
            photos.len(),
            orphaned_objects.len(),
            dangling_photos.len()
        );

        Ok(OrphanReport {
            orphaned_objects,
            dangling_photos,
        })
    }

    /// Remove orphaned objects older than the grace period
    pub async fn sweep_orphans(&self, dry_run: bool) -> Result<SweepReport> {
        let report = self.orphan_report(false).await?;
        let cutoff = Utc::now() - Duration::minutes(SWEEP_GRACE_MINUTES);

        let (keys, recent): (Vec<_>, Vec<_>) = report
            .orphaned_objects
            .into_iter()
            .partition(|object| !is_newer_than(object, cutoff));
        let keys: Vec<String> = keys.into_iter().map(|o| o.key).collect();

        if !dry_run && !keys.is_empty() {
            self.store.remove(&keys).await?;
            info!("Swept {} orphaned objects", keys.len());
        }

        Ok(SweepReport {
            dry_run,
            keys,
            skipped_recent: recent.len(),
        })
    }

    /// Point every dangling photo at a candidate URL of its category.
    ///
    /// The candidate is picked by display order, wrapping around the list.
    pub async fn repair_dangling_urls(
        &self,
        candidates: &HashMap<PhotoCategory, Vec<String>>,
        check_external: bool,
    ) -> Result<RepairReport> {
        let report = self.orphan_report(check_external).await?;
        let mut result = RepairReport::default();

        for dangling in report.dangling_photos {
            let photo = dangling.photo;
            let picked = candidates
                .get(&photo.category)
                .and_then(|urls| select_candidate(urls, photo.display_order));

            let Some(url) = picked else {
                warn!(
                    "No replacement candidates for photo {} in category {}",
                    photo.id, photo.category
                );
                result.skipped.push(photo.id);
                continue;
            };

            if self
                .repository
                .update(photo.id, PhotoChanges::image_url(url.clone()))
                .await?
                .is_some()
            {
                result.repaired.push((photo.id, url.clone()));
            }
        }

        info!(
            "Repaired {} photo URLs, skipped {}",
            result.repaired.len(),
            result.skipped.len()
        );
        Ok(result)
    }
}

/// Objects without a parseable timestamp are treated as old
fn is_newer_than(object: &StoredObject, cutoff: DateTime<Utc>) -> bool {
    object
        .last_modified
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc) > cutoff)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        FixedUrlProbe, InMemoryObjectStore, InMemoryPhotoRepository,
    };

    struct Fixture {
        store: Arc<InMemoryObjectStore>,
        repository: Arc<InMemoryPhotoRepository>,
        service: PhotoMaintenanceService,
    }

    fn fixture(reachable: bool) -> Fixture {
        let store = Arc::new(InMemoryObjectStore::new());
        let repository = Arc::new(InMemoryPhotoRepository::new());
        let service = PhotoMaintenanceService::new(
            store.clone(),
            repository.clone(),
            Arc::new(FixedUrlProbe(reachable)),
        );
        Fixture {
            store,
            repository,
            service,
        }
    }

    const OLD: &str = "2024-01-01T00:00:00Z";

    #[tokio::test]
    async fn test_orphan_report_finds_both_directions() {
        let f = fixture(true);
        f.store.put_object("photos/hero/1-aaa.jpg", Some(OLD));
        f.store.put_object("photos/hero/2-bbb.jpg", Some(OLD));
        let linked = f
            .repository
            .seed(PhotoCategory::Hero, &f.store.public_url("photos/hero/1-aaa.jpg"), 1);
        let missing = f
            .repository
            .seed(PhotoCategory::Hero, &f.store.public_url("photos/hero/9-zzz.jpg"), 2);

        let report = f.service.orphan_report(false).await.unwrap();

        let orphan_keys: Vec<&str> = report
            .orphaned_objects
            .iter()
            .map(|o| o.key.as_str())
            .collect();
        assert_eq!(orphan_keys, vec!["photos/hero/2-bbb.jpg"]);
        assert_eq!(report.dangling_photos.len(), 1);
        assert_eq!(report.dangling_photos[0].photo.id, missing.id);
        assert_eq!(
            report.dangling_photos[0].reason,
            DanglingReason::MissingObject
        );
        assert_ne!(report.dangling_photos[0].photo.id, linked.id);
    }

    #[tokio::test]
    async fn test_external_urls_probed_only_on_request() {
        let f = fixture(false);
        f.repository
            .seed(PhotoCategory::BrandLogo, "https://images.example.org/logo.png", 1);

        assert!(f
            .service
            .orphan_report(false)
            .await
            .unwrap()
            .dangling_photos
            .is_empty());

        let report = f.service.orphan_report(true).await.unwrap();
        assert_eq!(report.dangling_photos.len(), 1);
        assert_eq!(
            report.dangling_photos[0].reason,
            DanglingReason::Unreachable
        );
    }

    #[tokio::test]
    async fn test_sweep_dry_run_removes_nothing() {
        let f = fixture(true);
        f.store.put_object("photos/hero/1-aaa.jpg", Some(OLD));

        let report = f.service.sweep_orphans(true).await.unwrap();

        assert_eq!(report.keys, vec!["photos/hero/1-aaa.jpg".to_string()]);
        assert!(f.store.contains("photos/hero/1-aaa.jpg"));
    }

    #[tokio::test]
    async fn test_sweep_respects_grace_period() {
        let f = fixture(true);
        f.store.put_object("photos/hero/1-old.jpg", Some(OLD));
        let fresh = Utc::now().to_rfc3339();
        f.store.put_object("photos/hero/2-new.jpg", Some(&fresh));

        let report = f.service.sweep_orphans(false).await.unwrap();

        assert_eq!(report.keys, vec!["photos/hero/1-old.jpg".to_string()]);
        assert_eq!(report.skipped_recent, 1);
        assert!(!f.store.contains("photos/hero/1-old.jpg"));
        assert!(f.store.contains("photos/hero/2-new.jpg"));
    }

    #[tokio::test]
    async fn test_repair_uses_wrap_around_selection() {
        let f = fixture(true);
        let mut photos = Vec::new();
        for order in 1..=5 {
            photos.push(f.repository.seed(
                PhotoCategory::StorePhoto,
                &f.store.public_url(&format!("photos/store_photo/{}-gone.jpg", order)),
                order,
            ));
        }
        let missing_logo = f.repository.seed(
            PhotoCategory::BrandLogo,
            &f.store.public_url("photos/brand_logo/1-gone.png"),
            1,
        );

        let candidates = HashMap::from([(
            PhotoCategory::StorePhoto,
            vec![
                "https://cdn.test/a.jpg".to_string(),
                "https://cdn.test/b.jpg".to_string(),
                "https://cdn.test/c.jpg".to_string(),
            ],
        )]);

        let report = f
            .service
            .repair_dangling_urls(&candidates, false)
            .await
            .unwrap();

        assert_eq!(report.repaired.len(), 5);
        assert_eq!(report.skipped, vec![missing_logo.id]);

        let urls: Vec<String> = photos
            .iter()
            .map(|p| f.repository.get(p.id).unwrap().image_url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.test/a.jpg",
                "https://cdn.test/b.jpg",
                "https://cdn.test/c.jpg",
                "https://cdn.test/a.jpg",
                "https://cdn.test/b.jpg",
            ]
        );
    }
}
