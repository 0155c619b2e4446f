//! In-memory doubles for the storage and persistence ports, with failure injection

use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::models::{
    NewPhoto, Photo, PhotoCategory, PhotoChanges, PhotoFilter, PhotoSortField,
};
use crate::features::photos::repositories::PhotoRepository;
use crate::modules::storage::{ObjectStore, StoredObject, UrlProbe};
use crate::shared::types::SortOrder;

const PUBLIC_BASE: &str = "https://cdn.test/photos/";

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    fail_uploads: AtomicBool,
    fail_removes: AtomicBool,
    uploads: AtomicUsize,
    remove_calls: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    /// Successful uploads so far
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    pub fn put_object(&self, key: &str, last_modified: Option<&str>) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                key: key.to_string(),
                size: 1,
                last_modified: last_modified.map(str::to_string),
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("upload of '{}' refused", key)));
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                key: key.to_string(),
                size: data.len() as u64,
                last_modified: Some(Utc::now().to_rfc3339()),
            },
        );
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}{}", PUBLIC_BASE, key)
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(AppError::Storage("remove refused".to_string()));
        }
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.key.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(PUBLIC_BASE)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    fn key_prefix(&self) -> &str {
        "photos"
    }
}

#[derive(Default)]
pub struct InMemoryPhotoRepository {
    rows: Mutex<Vec<Photo>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    ticks: AtomicI64,
}

impl InMemoryPhotoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: Uuid) -> Option<Photo> {
        self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    /// Insert a row directly, bypassing failure injection
    pub fn seed(&self, category: PhotoCategory, image_url: &str, display_order: i32) -> Photo {
        let photo = self.build(NewPhoto {
            image_url: image_url.to_string(),
            category,
            title: None,
            subtitle: Some(Sentence(2..5).fake()),
            text_field_1: None,
            text_field_2: None,
            display_order,
            is_active: true,
        });
        self.rows.lock().unwrap().push(photo.clone());
        photo
    }

    pub fn set_active(&self, id: Uuid, active: bool) {
        if let Some(photo) = self.rows.lock().unwrap().iter_mut().find(|p| p.id == id) {
            photo.is_active = active;
        }
    }

    /// Strictly increasing timestamps keep insertion order observable
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::milliseconds(tick)
    }

    fn build(&self, photo: NewPhoto) -> Photo {
        let now = self.now();
        Photo {
            id: Uuid::new_v4(),
            image_url: photo.image_url,
            category: photo.category,
            title: photo.title,
            subtitle: photo.subtitle,
            text_field_1: photo.text_field_1,
            text_field_2: photo.text_field_2,
            display_order: photo.display_order,
            is_active: photo.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Query("read refused".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("write refused".to_string()));
        }
        Ok(())
    }
}

fn matches_filter(photo: &Photo, filter: &PhotoFilter) -> bool {
    if filter.category.is_some_and(|c| c != photo.category) {
        return false;
    }
    if filter.is_active.is_some_and(|a| a != photo.is_active) {
        return false;
    }
    match filter.search.as_deref().map(str::trim) {
        Some(search) if !search.is_empty() => {
            let needle = search.to_lowercase();
            [
                &photo.title,
                &photo.subtitle,
                &photo.text_field_1,
                &photo.text_field_2,
            ]
            .iter()
            .filter_map(|field| field.as_deref())
            .any(|value| value.to_lowercase().contains(&needle))
        }
        _ => true,
    }
}

fn compare(a: &Photo, b: &Photo, field: PhotoSortField) -> CmpOrdering {
    match field {
        PhotoSortField::DisplayOrder => a.display_order.cmp(&b.display_order),
        PhotoSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        PhotoSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        PhotoSortField::Title => a.title.cmp(&b.title),
        PhotoSortField::Category => (a.category as u8).cmp(&(b.category as u8)),
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn insert(&self, photo: NewPhoto) -> Result<Photo> {
        self.check_writes()?;
        let photo = self.build(photo);
        self.rows.lock().unwrap().push(photo.clone());
        Ok(photo)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Photo>> {
        self.check_reads()?;
        Ok(self.get(id))
    }

    async fn list(&self, filter: &PhotoFilter) -> Result<(Vec<Photo>, i64)> {
        self.check_reads()?;
        let mut rows: Vec<Photo> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let primary = compare(a, b, filter.sort_by);
            let primary = match filter.sort_order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_active_by_category(&self, category: PhotoCategory) -> Result<Vec<Photo>> {
        let filter = PhotoFilter {
            category: Some(category),
            is_active: Some(true),
            limit: i64::MAX,
            ..Default::default()
        };
        self.list(&filter).await.map(|(rows, _)| rows)
    }

    async fn list_all(&self) -> Result<Vec<Photo>> {
        let filter = PhotoFilter {
            sort_by: PhotoSortField::Category,
            limit: i64::MAX,
            ..Default::default()
        };
        self.list(&filter).await.map(|(rows, _)| rows)
    }

    async fn update(&self, id: Uuid, changes: PhotoChanges) -> Result<Option<Photo>> {
        self.check_writes()?;
        let now = self.now();
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|p| p.id == id).map(|photo| {
            *photo = photo.with_changes(&changes);
            photo.updated_at = now;
            photo.clone()
        }))
    }

    async fn update_display_orders(&self, orders: &[(Uuid, i32)]) -> Result<()> {
        self.check_writes()?;
        let mut rows = self.rows.lock().unwrap();
        if let Some((missing, _)) = orders
            .iter()
            .find(|(id, _)| !rows.iter().any(|p| p.id == *id))
        {
            return Err(AppError::NotFound(format!("Photo {} not found", missing)));
        }
        for (id, order) in orders {
            if let Some(photo) = rows.iter_mut().find(|p| p.id == *id) {
                photo.display_order = *order;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check_writes()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }

    async fn count_active_by_category(&self) -> Result<Vec<(PhotoCategory, i64)>> {
        self.check_reads()?;
        let mut counts: HashMap<PhotoCategory, i64> = HashMap::new();
        for photo in self.rows.lock().unwrap().iter().filter(|p| p.is_active) {
            *counts.entry(photo.category).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

/// Probe that answers the same for every URL
pub struct FixedUrlProbe(pub bool);

#[async_trait]
impl UrlProbe for FixedUrlProbe {
    async fn is_reachable(&self, _url: &str) -> bool {
        self.0
    }
}
