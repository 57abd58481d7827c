//! In-memory repository fakes shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use redazione::application::admin::posts::AdminPostService;
use redazione::application::admin::settings::AdminSettingsService;
use redazione::application::meta::MetaService;
use redazione::application::repos::{
    ContentRepo, IndexField, MetaRepo, NewMetaParams, NewRevisionParams, RepoError, SearchIndex,
    SettingsStore, TagsRepo, UserDirectory,
};
use redazione::domain::entities::{BlogPostRecord, CategoryRecord, MetaRecord, UserRecord};
use redazione::domain::language::Language;
use redazione::domain::types::SettingValue;
use redazione::infra::db::PostgresRepositories;
use redazione::infra::http::{AdminState, SiteContext};
use redazione::infra::images::{ImageStore, ImageStoreError, ThumbnailGenerator};

/// A minimal but valid 1x1 RGBA PNG.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<(String, String), SettingValue>>,
}

impl MemorySettings {
    pub async fn seed(&self, module: &str, key: &str, value: SettingValue) {
        self.values
            .lock()
            .await
            .insert((module.to_string(), key.to_string()), value);
    }

    pub async fn stored(&self, module: &str, key: &str) -> Option<SettingValue> {
        self.values
            .lock()
            .await
            .get(&(module.to_string(), key.to_string()))
            .cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.lock().await.is_empty()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self, module: &str, key: &str) -> Result<Option<SettingValue>, RepoError> {
        Ok(self
            .values
            .lock()
            .await
            .get(&(module.to_string(), key.to_string()))
            .cloned())
    }

    async fn set(&self, module: &str, key: &str, value: SettingValue) -> Result<(), RepoError> {
        self.values
            .lock()
            .await
            .insert((module.to_string(), key.to_string()), value);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryContent {
    max_item_id: Mutex<i64>,
    revisions: Mutex<Vec<BlogPostRecord>>,
    categories: Mutex<Vec<CategoryRecord>>,
}

impl MemoryContent {
    pub async fn seed_max_item_id(&self, max: i64) {
        *self.max_item_id.lock().await = max;
    }

    pub async fn seed_category(&self, id: i64, title: &str) {
        self.categories.lock().await.push(CategoryRecord {
            id,
            title: title.to_string(),
        });
    }

    pub async fn revisions(&self) -> Vec<BlogPostRecord> {
        self.revisions.lock().await.clone()
    }
}

#[async_trait]
impl ContentRepo for MemoryContent {
    async fn next_item_id(&self) -> Result<i64, RepoError> {
        // max(id)+1 under a lock, preserving the observable N -> N+1
        // allocation the production sequence provides.
        let mut max = self.max_item_id.lock().await;
        *max += 1;
        Ok(*max)
    }

    async fn insert_revision(&self, params: NewRevisionParams) -> Result<i64, RepoError> {
        let mut revisions = self.revisions.lock().await;
        let revision_id = revisions.len() as i64 + 1;
        revisions.push(BlogPostRecord {
            item_id: params.item_id,
            revision_id,
            meta_id: params.meta_id,
            category_id: params.category_id,
            user_id: params.user_id,
            language: params.language,
            title: params.title,
            introduction: params.introduction,
            text: params.text,
            image: None,
            publish_on: params.publish_on,
            created_on: params.created_on,
            edited_on: params.edited_on,
            hidden: params.hidden,
            allow_comments: params.allow_comments,
            num_comments: params.num_comments,
            status: params.status,
        });
        Ok(revision_id)
    }

    async fn set_revision_image(&self, revision_id: i64, image: &str) -> Result<(), RepoError> {
        let mut revisions = self.revisions.lock().await;
        match revisions
            .iter_mut()
            .find(|revision| revision.revision_id == revision_id)
        {
            Some(revision) => {
                revision.image = Some(image.to_string());
                Ok(())
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn categories(&self, _language: &Language) -> Result<Vec<CategoryRecord>, RepoError> {
        Ok(self.categories.lock().await.clone())
    }
}

#[derive(Default)]
pub struct MemoryMeta {
    records: Mutex<Vec<MetaRecord>>,
}

impl MemoryMeta {
    pub async fn records(&self) -> Vec<MetaRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl MetaRepo for MemoryMeta {
    async fn insert_meta(&self, params: NewMetaParams) -> Result<i64, RepoError> {
        let mut records = self.records.lock().await;
        let id = records.len() as i64 + 1;
        records.push(MetaRecord {
            id,
            url: params.url,
            title: params.title,
            description: params.description,
            keywords: params.keywords,
            language: params.language,
        });
        Ok(id)
    }

    async fn slug_exists(&self, url: &str, language: &Language) -> Result<bool, RepoError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .any(|record| record.url == url && record.language == *language))
    }
}

#[derive(Default)]
pub struct MemoryTags {
    saved: Mutex<Vec<(i64, Vec<String>, String)>>,
}

impl MemoryTags {
    pub async fn saved(&self) -> Vec<(i64, Vec<String>, String)> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl TagsRepo for MemoryTags {
    async fn save_tags(
        &self,
        item_id: i64,
        tags: &[String],
        module: &str,
    ) -> Result<(), RepoError> {
        self.saved
            .lock()
            .await
            .push((item_id, tags.to_vec(), module.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySearch {
    entries: Mutex<Vec<(String, i64, Vec<(String, String)>)>>,
}

impl MemorySearch {
    pub async fn entries(&self) -> Vec<(String, i64, Vec<(String, String)>)> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl SearchIndex for MemorySearch {
    async fn save_index(
        &self,
        module: &str,
        item_id: i64,
        fields: &[IndexField],
    ) -> Result<(), RepoError> {
        let fields = fields
            .iter()
            .map(|field| (field.name.to_string(), field.value.clone()))
            .collect();
        self.entries
            .lock()
            .await
            .push((module.to_string(), item_id, fields));
        Ok(())
    }
}

pub struct MemoryUsers {
    users: Vec<UserRecord>,
}

impl Default for MemoryUsers {
    fn default() -> Self {
        Self {
            users: vec![
                UserRecord {
                    id: 1,
                    display_name: "root".to_string(),
                    is_god: true,
                },
                UserRecord {
                    id: 7,
                    display_name: "editor".to_string(),
                    is_god: false,
                },
            ],
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUsers {
    async fn list_users(&self) -> Result<Vec<UserRecord>, RepoError> {
        Ok(self.users.clone())
    }

    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.users.iter().find(|user| user.id == id).cloned())
    }
}

/// Thumbnailer fake: records every call and copies the source file so the
/// derivative exists on disk.
#[derive(Default)]
pub struct CountingThumbnailer {
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl CountingThumbnailer {
    pub async fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ThumbnailGenerator for CountingThumbnailer {
    async fn generate(&self, source: &Path, destination: &Path) -> Result<(), ImageStoreError> {
        tokio::fs::copy(source, destination).await?;
        self.calls
            .lock()
            .await
            .push((source.to_path_buf(), destination.to_path_buf()));
        Ok(())
    }
}

/// All fakes wired into an [`AdminPostService`], plus the stores the tests
/// assert against.
pub struct PostHarness {
    pub service: AdminPostService,
    pub settings: Arc<MemorySettings>,
    pub content: Arc<MemoryContent>,
    pub meta: Arc<MemoryMeta>,
    pub tags: Arc<MemoryTags>,
    pub search: Arc<MemorySearch>,
    pub users: Arc<MemoryUsers>,
    pub thumbnailer: Arc<CountingThumbnailer>,
    pub images_root: PathBuf,
    _images_dir: tempfile::TempDir,
}

pub fn post_harness() -> PostHarness {
    let settings = Arc::new(MemorySettings::default());
    let content = Arc::new(MemoryContent::default());
    let meta = Arc::new(MemoryMeta::default());
    let tags = Arc::new(MemoryTags::default());
    let search = Arc::new(MemorySearch::default());
    let users = Arc::new(MemoryUsers::default());
    let thumbnailer = Arc::new(CountingThumbnailer::default());

    let images_dir = tempfile::tempdir().expect("temp dir");
    let images_root = images_dir.path().join("blog");
    let images = Arc::new(ImageStore::new(images_root.clone(), thumbnailer.clone()));

    let service = AdminPostService::new(
        content.clone(),
        settings.clone(),
        users.clone(),
        tags.clone(),
        search.clone(),
        MetaService::new(meta.clone()),
        images,
    );

    PostHarness {
        service,
        settings,
        content,
        meta,
        tags,
        search,
        users,
        thumbnailer,
        images_root,
        _images_dir: images_dir,
    }
}

pub fn settings_service(store: Arc<MemorySettings>) -> AdminSettingsService {
    AdminSettingsService::new(store)
}

/// Wire the harness into an [`AdminState`] suitable for driving the admin
/// router. The database handle is lazy and never touched by these routes.
pub fn admin_state(harness: &PostHarness) -> AdminState {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .expect("lazy pool");

    AdminState {
        db: Arc::new(PostgresRepositories::new(pool)),
        posts: Arc::new(harness.service.clone()),
        settings: Arc::new(AdminSettingsService::new(harness.settings.clone())),
        users: harness.users.clone(),
        site: SiteContext {
            default_language: "en".parse().expect("language"),
            timezone: chrono_tz::UTC,
            public_url: None,
        },
    }
}
