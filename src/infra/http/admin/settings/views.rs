//! Serialized view models for the settings form.

use serde::Serialize;

use crate::application::admin::FieldError;
use crate::application::admin::settings::BlogSettingsSnapshot;
use crate::infra::http::SiteContext;

/// A dropdown of integer choices with the stored selection.
#[derive(Debug, Serialize)]
pub(crate) struct CountDropdown {
    pub options: Vec<i64>,
    pub selected: i64,
}

impl CountDropdown {
    fn new(min: i64, max: i64, selected: i64) -> Self {
        Self {
            options: (min..=max).collect(),
            selected,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SettingsFormView {
    pub overview_number_of_items: CountDropdown,
    pub recent_articles_full_number_of_items: CountDropdown,
    pub recent_articles_list_number_of_items: CountDropdown,
    pub spamfilter: bool,
    /// True when the spam filter cannot be enabled; the control renders
    /// disabled and a warning is shown.
    pub spamfilter_disabled: bool,
    pub no_akismet_key: bool,
    pub allow_comments: bool,
    pub moderation: bool,
    pub notify_by_email_on_new_comment_to_moderate: bool,
    pub notify_by_email_on_new_comment: bool,
    pub rss_meta: bool,
    pub rss_title: String,
    pub rss_description: String,
    /// Present only for god users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_image_form: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_rss_url: Option<String>,
}

pub(crate) fn build_settings_view(
    snapshot: BlogSettingsSnapshot,
    is_god: bool,
    site: &SiteContext,
) -> SettingsFormView {
    let comments_rss_url = site
        .public_url
        .as_ref()
        .and_then(|base| base.join("blog/comments-rss").ok())
        .map(|url| url.to_string());

    SettingsFormView {
        overview_number_of_items: CountDropdown::new(1, 30, snapshot.overview_num_items),
        recent_articles_full_number_of_items: CountDropdown::new(
            1,
            10,
            snapshot.recent_articles_full_num_items,
        ),
        recent_articles_list_number_of_items: CountDropdown::new(
            1,
            10,
            snapshot.recent_articles_list_num_items,
        ),
        spamfilter: snapshot.spamfilter,
        spamfilter_disabled: !snapshot.akismet_configured,
        no_akismet_key: !snapshot.akismet_configured,
        allow_comments: snapshot.allow_comments,
        moderation: snapshot.moderation,
        notify_by_email_on_new_comment_to_moderate: snapshot
            .notify_by_email_on_new_comment_to_moderate,
        notify_by_email_on_new_comment: snapshot.notify_by_email_on_new_comment,
        rss_meta: snapshot.rss_meta,
        rss_title: snapshot.rss_title,
        rss_description: snapshot.rss_description,
        show_image_form: is_god.then_some(snapshot.show_image_form),
        comments_rss_url,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SettingsFormErrors {
    pub errors: Vec<FieldError>,
}
