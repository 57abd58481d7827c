//! Preparation and persistence of SEO meta records.
//!
//! Submitted meta fields are optional overrides: absent fields fall back to
//! the post title. The URL slug is derived from the requested slug text (or
//! the title) and made unique per language against the meta store.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{MetaRepo, NewMetaParams, RepoError};
use crate::domain::language::Language;
use crate::domain::slug::{SlugError, SlugLookupError, unique_slug};

#[derive(Debug, Error)]
pub enum MetaError {
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Optional overrides submitted alongside the content fields.
#[derive(Debug, Clone, Default)]
pub struct MetaFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub url: Option<String>,
}

/// Meta fields after fallback resolution, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
    /// Human-readable text the URL slug is derived from.
    pub url_source: String,
}

/// Resolve submitted overrides against the post title.
///
/// Fails only when neither an override nor a usable fallback exists, which
/// the form layer reports as a field error on the meta title.
pub fn prepare(fields: MetaFields, fallback_title: &str) -> Result<PreparedMeta, SlugError> {
    let fallback = fallback_title.trim();
    let title = non_empty(fields.title).unwrap_or_else(|| fallback.to_string());
    if title.is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let description = non_empty(fields.description).unwrap_or_else(|| title.clone());
    let keywords = non_empty(fields.keywords).unwrap_or_else(|| title.clone());
    let url_source = non_empty(fields.url).unwrap_or_else(|| title.clone());

    // Derivation is repeated at save time; failing here keeps bad slugs a
    // form-level error instead of a persistence failure.
    crate::domain::slug::derive_slug(&url_source)?;

    Ok(PreparedMeta {
        title,
        description,
        keywords,
        url_source,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedMeta {
    pub id: i64,
    pub url: String,
}

#[derive(Clone)]
pub struct MetaService {
    repo: Arc<dyn MetaRepo>,
}

impl MetaService {
    pub fn new(repo: Arc<dyn MetaRepo>) -> Self {
        Self { repo }
    }

    /// Persist a prepared meta record, uniquifying its slug within the
    /// working language.
    pub async fn save(
        &self,
        prepared: PreparedMeta,
        language: &Language,
    ) -> Result<SavedMeta, MetaError> {
        let repo = self.repo.clone();
        let url = unique_slug(&prepared.url_source, move |candidate| {
            let repo = repo.clone();
            let language = language.clone();
            async move { repo.slug_exists(&candidate, &language).await }
        })
        .await
        .map_err(|err| match err {
            SlugLookupError::Slug(slug) => MetaError::Slug(slug),
            SlugLookupError::Lookup(repo) => MetaError::Repo(repo),
        })?;

        let id = self
            .repo
            .insert_meta(NewMetaParams {
                url: url.clone(),
                title: prepared.title,
                description: prepared.description,
                keywords: prepared.keywords,
                language: language.clone(),
            })
            .await?;

        Ok(SavedMeta { id, url })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
