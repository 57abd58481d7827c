//! Repository traits describing the persistence and indexing adapters the
//! admin actions depend on.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{CategoryRecord, UserRecord};
use crate::domain::language::Language;
use crate::domain::types::{PublicationStatus, SettingValue};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Flat per-module key/value settings store. Reads return `None` for absent
/// keys; typed accessors apply caller-supplied defaults.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, module: &str, key: &str) -> Result<Option<SettingValue>, RepoError>;

    async fn set(&self, module: &str, key: &str, value: SettingValue) -> Result<(), RepoError>;

    async fn get_bool(&self, module: &str, key: &str, default: bool) -> Result<bool, RepoError> {
        Ok(self
            .get(module, key)
            .await?
            .and_then(|value| value.as_bool())
            .unwrap_or(default))
    }

    async fn get_int(&self, module: &str, key: &str, default: i64) -> Result<i64, RepoError> {
        Ok(self
            .get(module, key)
            .await?
            .and_then(|value| value.as_int())
            .unwrap_or(default))
    }

    async fn get_text(
        &self,
        module: &str,
        key: &str,
        default: &str,
    ) -> Result<String, RepoError> {
        Ok(self
            .get(module, key)
            .await?
            .and_then(|value| value.as_text().map(str::to_string))
            .unwrap_or_else(|| default.to_string()))
    }
}

/// Fields of a revision to be inserted. The revision id is assigned by the
/// persistence layer on insert.
#[derive(Debug, Clone)]
pub struct NewRevisionParams {
    pub item_id: i64,
    pub meta_id: i64,
    pub category_id: i64,
    pub user_id: i64,
    pub language: Language,
    pub title: String,
    pub introduction: String,
    pub text: String,
    pub publish_on: OffsetDateTime,
    pub created_on: OffsetDateTime,
    pub edited_on: OffsetDateTime,
    pub hidden: bool,
    pub allow_comments: bool,
    pub num_comments: i32,
    pub status: PublicationStatus,
}

#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// Allocate the next item id. Allocation is atomic; two concurrent
    /// submissions never observe the same id.
    async fn next_item_id(&self) -> Result<i64, RepoError>;

    /// Insert a revision and return its assigned revision id.
    async fn insert_revision(&self, params: NewRevisionParams) -> Result<i64, RepoError>;

    /// Patch the image column of an existing revision without creating a
    /// new revision.
    async fn set_revision_image(&self, revision_id: i64, image: &str) -> Result<(), RepoError>;

    async fn categories(&self, language: &Language) -> Result<Vec<CategoryRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct NewMetaParams {
    pub url: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub language: Language,
}

#[async_trait]
pub trait MetaRepo: Send + Sync {
    /// Insert a meta record and return its assigned id.
    async fn insert_meta(&self, params: NewMetaParams) -> Result<i64, RepoError>;

    async fn slug_exists(&self, url: &str, language: &Language) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, RepoError>;

    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>, RepoError>;
}

#[async_trait]
pub trait TagsRepo: Send + Sync {
    /// Replace the tag set of an item within the given module scope.
    async fn save_tags(&self, item_id: i64, tags: &[String], module: &str)
    -> Result<(), RepoError>;
}

/// A named field pushed into the search index for one item.
#[derive(Debug, Clone)]
pub struct IndexField {
    pub name: &'static str,
    pub value: String,
}

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Upsert the indexed fields for (module, item). Draft content is never
    /// submitted here.
    async fn save_index(
        &self,
        module: &str,
        item_id: i64,
        fields: &[IndexField],
    ) -> Result<(), RepoError>;
}
