use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::models::{
    NewPhoto, Photo, PhotoCategory, PhotoChanges, PhotoMetadata,
};
use crate::features::photos::repositories::PhotoRepository;
use crate::features::photos::services::category_registry::{CategoryRegistry, ImageFormat};
use crate::modules::storage::ObjectStore;
use crate::shared::validation::non_blank;

/// Image payload received from a client
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Cleanup of a partially applied write failed.
///
/// Only ever logged or attached as a warning, never returned as the primary error.
#[derive(Debug, Error)]
#[error("Failed to remove object '{key}' during cleanup: {source}")]
pub struct CompensationError {
    pub key: String,
    #[source]
    pub source: AppError,
}

/// Result of replacing the image of an existing photo
#[derive(Debug)]
pub struct ReplaceOutcome {
    pub photo: Photo,
    /// Set when the previous object could not be removed
    pub warning: Option<String>,
}

/// Result of deleting a photo
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub id: Uuid,
    pub object_removed: bool,
    /// Set when the row is gone but its object could not be removed
    pub warning: Option<String>,
}

/// Build the storage key for a new object:
/// `{prefix}/{category}/{unix_micros}-{12 hex chars}.{ext}`
pub fn generate_photo_key(prefix: &str, category: PhotoCategory, format: ImageFormat) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}/{}-{}.{}",
        prefix,
        category,
        Utc::now().timestamp_micros(),
        &suffix[..12],
        format.extension()
    )
}

/// Keeps each photo row and its stored object consistent across the
/// create, replace and delete operations
pub struct PhotoTransactionService {
    store: Arc<dyn ObjectStore>,
    repository: Arc<dyn PhotoRepository>,
    max_file_size: usize,
}

impl PhotoTransactionService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        repository: Arc<dyn PhotoRepository>,
        max_file_size: usize,
    ) -> Self {
        Self {
            store,
            repository,
            max_file_size,
        }
    }

    /// Upload limit for `category`: the smaller of the category and configured limits
    pub fn effective_max_file_size(&self, category: PhotoCategory) -> usize {
        CategoryRegistry::describe(category)
            .max_file_size
            .min(self.max_file_size)
    }

    fn validate_file(&self, category: PhotoCategory, upload: &PhotoUpload) -> Result<ImageFormat> {
        let descriptor = CategoryRegistry::describe(category);

        let format = ImageFormat::from_content_type(&upload.content_type)
            .filter(|format| descriptor.accepts(*format))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "File type '{}' is not allowed for category '{}'. Allowed types: {}",
                    upload.content_type,
                    category,
                    descriptor.accepted_mime_types().join(", ")
                ))
            })?;

        if upload.data.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }

        let limit = self.effective_max_file_size(category);
        if upload.data.len() > limit {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                limit,
                limit / 1024 / 1024
            )));
        }

        Ok(format)
    }

    async fn upload_object(
        &self,
        category: PhotoCategory,
        format: ImageFormat,
        upload: PhotoUpload,
    ) -> Result<(String, String)> {
        let key = generate_photo_key(self.store.key_prefix(), category, format);
        let size = upload.data.len();

        self.store
            .upload(&key, upload.data, &upload.content_type)
            .await?;

        debug!(
            "Stored '{}' as '{}' ({} bytes)",
            upload.filename, key, size
        );

        let url = self.store.public_url(&key);
        Ok((key, url))
    }

    /// Best-effort removal of an object written by a step that is being undone
    async fn compensate(&self, key: &str) {
        if let Err(source) = self.store.remove(&[key.to_string()]).await {
            let err = CompensationError {
                key: key.to_string(),
                source,
            };
            warn!("{}", err);
        }
    }

    /// Upload a new image and insert its row.
    ///
    /// Every validation runs before any I/O. If the insert fails the uploaded
    /// object is removed again, so a failed create never leaves an orphan behind.
    pub async fn create(&self, upload: PhotoUpload, metadata: PhotoMetadata) -> Result<Photo> {
        let metadata = PhotoMetadata {
            title: non_blank(metadata.title),
            subtitle: non_blank(metadata.subtitle),
            text_field_1: non_blank(metadata.text_field_1),
            text_field_2: non_blank(metadata.text_field_2),
            ..metadata
        };

        CategoryRegistry::check_required_fields(&metadata)?;
        let format = self.validate_file(metadata.category, &upload)?;

        let (key, url) = self
            .upload_object(metadata.category, format, upload)
            .await?;

        match self
            .repository
            .insert(NewPhoto::from_metadata(url, metadata))
            .await
        {
            Ok(photo) => {
                info!(
                    "Created photo {} in category {} ({})",
                    photo.id, photo.category, key
                );
                Ok(photo)
            }
            Err(e) => {
                self.compensate(&key).await;
                Err(e)
            }
        }
    }

    async fn find_existing(&self, id: Uuid) -> Result<Photo> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))
    }

    /// Swap the image of an existing photo.
    ///
    /// The old object is only removed after the row points at the new one;
    /// failing to remove it is reported as a warning on a successful result.
    pub async fn replace_image(&self, id: Uuid, upload: PhotoUpload) -> Result<ReplaceOutcome> {
        let existing = self.find_existing(id).await?;
        let format = self.validate_file(existing.category, &upload)?;

        let (key, url) = self
            .upload_object(existing.category, format, upload)
            .await?;

        let updated = match self
            .repository
            .update(id, PhotoChanges::image_url(url))
            .await
        {
            Ok(Some(photo)) => photo,
            Ok(None) => {
                self.compensate(&key).await;
                return Err(AppError::NotFound(format!("Photo {} not found", id)));
            }
            Err(e) => {
                self.compensate(&key).await;
                return Err(e);
            }
        };

        let mut warning = None;
        // URLs outside the managed bucket (placeholders, external hosts) are left alone
        if let Some(old_key) = self.store.key_from_url(&existing.image_url) {
            if old_key != key {
                if let Err(source) = self.store.remove(&[old_key.clone()]).await {
                    let err = CompensationError {
                        key: old_key,
                        source,
                    };
                    warn!("Photo {} image replaced but {}", id, err);
                    warning = Some(err.to_string());
                }
            }
        }

        info!("Replaced image of photo {} with '{}'", id, key);
        Ok(ReplaceOutcome {
            photo: updated,
            warning,
        })
    }

    /// Patch metadata. The merged row must still satisfy its category's required fields.
    pub async fn update(&self, id: Uuid, mut changes: PhotoChanges) -> Result<Photo> {
        // Blank strings clear the column
        changes.title = changes.title.map(non_blank);
        changes.subtitle = changes.subtitle.map(non_blank);
        changes.text_field_1 = changes.text_field_1.map(non_blank);
        changes.text_field_2 = changes.text_field_2.map(non_blank);

        let existing = self.find_existing(id).await?;
        let merged = existing.with_changes(&changes);
        CategoryRegistry::check_required_fields(&PhotoMetadata::from(&merged))?;

        let photo = self
            .repository
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))?;

        debug!("Updated metadata of photo {}", id);
        Ok(photo)
    }

    /// Delete the row, then its object.
    ///
    /// A failed row delete aborts with the object untouched. A failed object
    /// removal still counts as success, with a warning for later sweeping.
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome> {
        let existing = self.find_existing(id).await?;

        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!("Photo {} not found", id)));
        }

        let mut outcome = DeleteOutcome {
            id,
            object_removed: false,
            warning: None,
        };

        if let Some(key) = self.store.key_from_url(&existing.image_url) {
            match self.store.remove(&[key.clone()]).await {
                Ok(()) => outcome.object_removed = true,
                Err(source) => {
                    let err = CompensationError { key, source };
                    warn!("Photo {} deleted but {}", id, err);
                    outcome.warning = Some(err.to_string());
                }
            }
        }

        info!(
            "Deleted photo {} (object removed: {})",
            id, outcome.object_removed
        );
        Ok(outcome)
    }

    /// Delete every id independently; one failure does not stop the rest
    pub async fn delete_many(&self, ids: &[Uuid]) -> Vec<(Uuid, Result<DeleteOutcome>)> {
        let mut seen = HashSet::new();
        let mut results = Vec::with_capacity(ids.len());

        for id in ids.iter().copied().filter(|id| seen.insert(*id)) {
            results.push((id, self.delete(id).await));
        }

        results
    }

    /// Apply new display orders in one database transaction
    pub async fn reorder(&self, orders: &[(Uuid, i32)]) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some((id, _)) = orders.iter().find(|(id, _)| !seen.insert(*id)) {
            return Err(AppError::Validation(format!(
                "Photo {} appears more than once",
                id
            )));
        }

        if orders.is_empty() {
            return Ok(());
        }

        self.repository.update_display_orders(orders).await?;
        info!("Reordered {} photos", orders.len());
        Ok(())
    }
}
