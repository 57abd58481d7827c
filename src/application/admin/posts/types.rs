use thiserror::Error;
use time::OffsetDateTime;

use crate::application::meta::{MetaError, PreparedMeta};
use crate::application::repos::RepoError;
use crate::domain::entities::{CategoryRecord, UserRecord};
use crate::domain::language::Language;
use crate::domain::types::PublicationStatus;
use crate::infra::images::{ImagePayload, ImageStoreError};

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("`{0}` must not be empty")]
    ConstraintViolation(&'static str),
    #[error(transparent)]
    Meta(#[from] MetaError),
    #[error(transparent)]
    Image(#[from] ImageStoreError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A fully validated create submission. All fields are typed; `publish_on`
/// is already converted to UTC. Validation happens entirely before the
/// service touches any store.
#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub introduction: String,
    pub text: String,
    pub category_id: i64,
    pub user_id: i64,
    pub language: Language,
    pub hidden: bool,
    pub allow_comments: bool,
    pub publish_on: OffsetDateTime,
    pub status: PublicationStatus,
    pub tags: Vec<String>,
    pub meta: PreparedMeta,
    pub image: Option<ImagePayload>,
}

/// Everything the create form needs beyond the submission itself.
#[derive(Debug, Clone)]
pub struct PostFormContext {
    pub categories: Vec<CategoryRecord>,
    pub users: Vec<UserRecord>,
    pub allow_comments_default: bool,
    pub image_enabled: bool,
}

pub(super) fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), AdminPostError> {
    if value.trim().is_empty() {
        return Err(AdminPostError::ConstraintViolation(field));
    }
    Ok(())
}
