//! Admin service for the blog module settings form.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{RepoError, SettingsStore};
use crate::domain::language::Language;
use crate::domain::types::modules;

pub const OVERVIEW_NUM_ITEMS: &str = "overview_num_items";
pub const RECENT_ARTICLES_FULL_NUM_ITEMS: &str = "recent_articles_full_num_items";
pub const RECENT_ARTICLES_LIST_NUM_ITEMS: &str = "recent_articles_list_num_items";
pub const SPAMFILTER: &str = "spamfilter";
pub const ALLOW_COMMENTS: &str = "allow_comments";
pub const MODERATION: &str = "moderation";
pub const NOTIFY_ON_COMMENT_TO_MODERATE: &str = "notify_by_email_on_new_comment_to_moderate";
pub const NOTIFY_ON_COMMENT: &str = "notify_by_email_on_new_comment";
pub const RSS_META: &str = "rss_meta";
pub const RSS_TITLE: &str = "rss_title";
pub const RSS_DESCRIPTION: &str = "rss_description";
pub const SHOW_IMAGE_FORM: &str = "show_image_form";
pub const AKISMET_KEY: &str = "akismet_key";

#[derive(Debug, Error)]
pub enum AdminSettingsError {
    #[error("`{0}` must not be empty")]
    ConstraintViolation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Current settings of the blog module, with defaults applied, as needed to
/// render the settings form.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogSettingsSnapshot {
    pub overview_num_items: i64,
    pub recent_articles_full_num_items: i64,
    pub recent_articles_list_num_items: i64,
    pub spamfilter: bool,
    pub allow_comments: bool,
    pub moderation: bool,
    pub notify_by_email_on_new_comment_to_moderate: bool,
    pub notify_by_email_on_new_comment: bool,
    pub rss_meta: bool,
    pub rss_title: String,
    pub rss_description: String,
    pub show_image_form: bool,
    /// False when no usable Akismet key exists; the spam filter cannot be
    /// enabled in that case.
    pub akismet_configured: bool,
}

/// A validated settings submission. RSS fields apply to the working
/// language only; `show_image_form` is honored only for god users.
#[derive(Debug, Clone)]
pub struct UpdateBlogSettingsCommand {
    pub overview_num_items: i64,
    pub recent_articles_full_num_items: i64,
    pub recent_articles_list_num_items: i64,
    pub spamfilter: bool,
    pub allow_comments: bool,
    pub moderation: bool,
    pub notify_by_email_on_new_comment_to_moderate: bool,
    pub notify_by_email_on_new_comment: bool,
    pub rss_meta: bool,
    pub rss_title: String,
    pub rss_description: String,
    pub show_image_form: Option<bool>,
}

#[derive(Clone)]
pub struct AdminSettingsService {
    store: Arc<dyn SettingsStore>,
}

impl AdminSettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub async fn load(
        &self,
        language: &Language,
    ) -> Result<BlogSettingsSnapshot, AdminSettingsError> {
        let store = self.store.as_ref();

        Ok(BlogSettingsSnapshot {
            overview_num_items: store.get_int(modules::BLOG, OVERVIEW_NUM_ITEMS, 10).await?,
            recent_articles_full_num_items: store
                .get_int(modules::BLOG, RECENT_ARTICLES_FULL_NUM_ITEMS, 5)
                .await?,
            recent_articles_list_num_items: store
                .get_int(modules::BLOG, RECENT_ARTICLES_LIST_NUM_ITEMS, 5)
                .await?,
            spamfilter: store.get_bool(modules::BLOG, SPAMFILTER, false).await?,
            allow_comments: store.get_bool(modules::BLOG, ALLOW_COMMENTS, false).await?,
            moderation: store.get_bool(modules::BLOG, MODERATION, false).await?,
            notify_by_email_on_new_comment_to_moderate: store
                .get_bool(modules::BLOG, NOTIFY_ON_COMMENT_TO_MODERATE, false)
                .await?,
            notify_by_email_on_new_comment: store
                .get_bool(modules::BLOG, NOTIFY_ON_COMMENT, false)
                .await?,
            rss_meta: store
                .get_bool(modules::BLOG, &language.suffix_key(RSS_META), true)
                .await?,
            rss_title: store
                .get_text(modules::BLOG, &language.suffix_key(RSS_TITLE), "")
                .await?,
            rss_description: store
                .get_text(modules::BLOG, &language.suffix_key(RSS_DESCRIPTION), "")
                .await?,
            show_image_form: store
                .get_bool(modules::BLOG, SHOW_IMAGE_FORM, true)
                .await?,
            akismet_configured: self.akismet_configured().await?,
        })
    }

    /// Persist a settings submission for the working language.
    pub async fn update(
        &self,
        language: &Language,
        is_god: bool,
        command: UpdateBlogSettingsCommand,
    ) -> Result<(), AdminSettingsError> {
        if command.rss_title.trim().is_empty() {
            return Err(AdminSettingsError::ConstraintViolation(RSS_TITLE));
        }

        let store = self.store.as_ref();
        store
            .set(
                modules::BLOG,
                OVERVIEW_NUM_ITEMS,
                command.overview_num_items.into(),
            )
            .await?;
        store
            .set(
                modules::BLOG,
                RECENT_ARTICLES_FULL_NUM_ITEMS,
                command.recent_articles_full_num_items.into(),
            )
            .await?;
        store
            .set(
                modules::BLOG,
                RECENT_ARTICLES_LIST_NUM_ITEMS,
                command.recent_articles_list_num_items.into(),
            )
            .await?;
        store
            .set(modules::BLOG, SPAMFILTER, command.spamfilter.into())
            .await?;
        store
            .set(modules::BLOG, ALLOW_COMMENTS, command.allow_comments.into())
            .await?;
        store
            .set(modules::BLOG, MODERATION, command.moderation.into())
            .await?;
        store
            .set(
                modules::BLOG,
                NOTIFY_ON_COMMENT_TO_MODERATE,
                command.notify_by_email_on_new_comment_to_moderate.into(),
            )
            .await?;
        store
            .set(
                modules::BLOG,
                NOTIFY_ON_COMMENT,
                command.notify_by_email_on_new_comment.into(),
            )
            .await?;
        store
            .set(
                modules::BLOG,
                &language.suffix_key(RSS_TITLE),
                command.rss_title.into(),
            )
            .await?;
        store
            .set(
                modules::BLOG,
                &language.suffix_key(RSS_DESCRIPTION),
                command.rss_description.into(),
            )
            .await?;
        store
            .set(
                modules::BLOG,
                &language.suffix_key(RSS_META),
                command.rss_meta.into(),
            )
            .await?;

        if is_god && let Some(show_image_form) = command.show_image_form {
            store
                .set(modules::BLOG, SHOW_IMAGE_FORM, show_image_form.into())
                .await?;
        }

        // A spam filter without a usable Akismet key cannot function; never
        // leave one enabled in that state.
        if !self.akismet_configured().await? {
            store.set(modules::BLOG, SPAMFILTER, false.into()).await?;
        }

        Ok(())
    }

    /// An Akismet key that is absent or blank counts as unconfigured; both
    /// states mean the filter cannot run.
    async fn akismet_configured(&self) -> Result<bool, AdminSettingsError> {
        let key = self.store.get(modules::CORE, AKISMET_KEY).await?;
        Ok(key
            .as_ref()
            .and_then(|value| value.as_text())
            .is_some_and(|value| !value.trim().is_empty()))
    }
}
