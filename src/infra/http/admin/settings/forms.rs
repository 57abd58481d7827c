//! Settings form: deserialization and validation.

use serde::Deserialize;

use crate::application::admin::FieldError;
use crate::application::admin::settings::UpdateBlogSettingsCommand;

use super::validators::int_in_range;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SettingsUpdateRequest {
    pub(crate) overview_number_of_items: Option<i64>,
    pub(crate) recent_articles_full_number_of_items: Option<i64>,
    pub(crate) recent_articles_list_number_of_items: Option<i64>,
    #[serde(default)]
    pub(crate) spamfilter: bool,
    #[serde(default)]
    pub(crate) allow_comments: bool,
    #[serde(default)]
    pub(crate) moderation: bool,
    #[serde(default)]
    pub(crate) notify_by_email_on_new_comment_to_moderate: bool,
    #[serde(default)]
    pub(crate) notify_by_email_on_new_comment: bool,
    #[serde(default)]
    pub(crate) rss_meta: bool,
    pub(crate) rss_title: Option<String>,
    pub(crate) rss_description: Option<String>,
    /// Elevated setting; ignored unless the acting user is a god user.
    pub(crate) show_image_form: Option<bool>,
}

impl SettingsUpdateRequest {
    pub(crate) fn validate(self) -> Result<UpdateBlogSettingsCommand, Vec<FieldError>> {
        let mut errors = Vec::new();

        let overview = int_in_range(self.overview_number_of_items, 1, 30, "overview_number_of_items");
        let recent_full = int_in_range(
            self.recent_articles_full_number_of_items,
            1,
            10,
            "recent_articles_full_number_of_items",
        );
        let recent_list = int_in_range(
            self.recent_articles_list_number_of_items,
            1,
            10,
            "recent_articles_list_number_of_items",
        );

        for result in [&overview, &recent_full, &recent_list] {
            if let Err(error) = result {
                errors.push(error.clone());
            }
        }

        let rss_title = self.rss_title.unwrap_or_default().trim().to_string();
        if rss_title.is_empty() {
            errors.push(FieldError::required("rss_title"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpdateBlogSettingsCommand {
            overview_num_items: overview.expect("validated range"),
            recent_articles_full_num_items: recent_full.expect("validated range"),
            recent_articles_list_num_items: recent_list.expect("validated range"),
            spamfilter: self.spamfilter,
            allow_comments: self.allow_comments,
            moderation: self.moderation,
            notify_by_email_on_new_comment_to_moderate: self
                .notify_by_email_on_new_comment_to_moderate,
            notify_by_email_on_new_comment: self.notify_by_email_on_new_comment,
            rss_meta: self.rss_meta,
            rss_title,
            rss_description: self.rss_description.unwrap_or_default(),
            show_image_form: self.show_image_form,
        })
    }
}
