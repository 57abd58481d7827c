use time::OffsetDateTime;
use tracing::debug;

use crate::application::repos::{IndexField, NewRevisionParams};
use crate::domain::entities::BlogPostRecord;
use crate::domain::language::Language;
use crate::domain::types::{PublicationStatus, modules};

use super::service::{ALLOW_COMMENTS, AdminPostService, SHOW_IMAGE_FORM};
use super::types::{AdminPostError, CreatePostCommand, PostFormContext, ensure_non_empty};

impl AdminPostService {
    /// Load everything the create form needs: category and author options
    /// plus the per-module defaults.
    pub async fn form_context(
        &self,
        language: &Language,
    ) -> Result<PostFormContext, AdminPostError> {
        let image_enabled = self
            .settings
            .get_bool(modules::BLOG, SHOW_IMAGE_FORM, true)
            .await?;
        let allow_comments_default = self
            .settings
            .get_bool(modules::BLOG, ALLOW_COMMENTS, false)
            .await?;
        let categories = self.content.categories(language).await?;
        let users = self.users.list_users().await?;

        Ok(PostFormContext {
            categories,
            users,
            allow_comments_default,
            image_enabled,
        })
    }

    /// Persist a validated create submission.
    ///
    /// Order of effects: allocate the item id, save the meta record, insert
    /// the revision, attach the optional image (patching the revision in
    /// place), save tags, and index the item when it is active. Draft items
    /// never reach the search index.
    pub async fn create_post(
        &self,
        command: CreatePostCommand,
    ) -> Result<BlogPostRecord, AdminPostError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.text, "text")?;

        let image_enabled = self
            .settings
            .get_bool(modules::BLOG, SHOW_IMAGE_FORM, true)
            .await?;

        let item_id = self.content.next_item_id().await?;
        let meta = self
            .meta
            .save(command.meta.clone(), &command.language)
            .await?;

        // Editor-supplied HTML never reaches storage unsanitized.
        let introduction = ammonia::clean(&command.introduction);
        let text = ammonia::clean(&command.text);

        let created_on = OffsetDateTime::now_utc();
        let revision_id = self
            .content
            .insert_revision(NewRevisionParams {
                item_id,
                meta_id: meta.id,
                category_id: command.category_id,
                user_id: command.user_id,
                language: command.language.clone(),
                title: command.title.clone(),
                introduction: introduction.clone(),
                text: text.clone(),
                publish_on: command.publish_on,
                created_on,
                edited_on: created_on,
                hidden: command.hidden,
                allow_comments: command.allow_comments,
                num_comments: 0,
                status: command.status,
            })
            .await?;

        let mut image = None;
        if image_enabled {
            // The folder layout is prepared whenever images are enabled,
            // even for submissions that carry none.
            self.images.ensure_layout().await?;

            if let Some(payload) = command.image.as_ref() {
                let filename = format!(
                    "{}-{}-{}.{}",
                    meta.url, command.language, revision_id, payload.extension
                );
                let stored = self.images.attach(&filename, payload).await?;
                debug!(
                    filename = %filename,
                    size_bytes = stored.size_bytes,
                    checksum = %stored.checksum,
                    "stored revision image"
                );
                self.content
                    .set_revision_image(revision_id, &filename)
                    .await?;
                image = Some(filename);
            }
        }

        self.tags
            .save_tags(item_id, &command.tags, modules::BLOG)
            .await?;

        if command.status == PublicationStatus::Active {
            self.search
                .save_index(
                    modules::BLOG,
                    item_id,
                    &[
                        IndexField {
                            name: "title",
                            value: command.title.clone(),
                        },
                        IndexField {
                            name: "text",
                            value: text.clone(),
                        },
                    ],
                )
                .await?;
        }

        Ok(BlogPostRecord {
            item_id,
            revision_id,
            meta_id: meta.id,
            category_id: command.category_id,
            user_id: command.user_id,
            language: command.language,
            title: command.title,
            introduction,
            text,
            image,
            publish_on: command.publish_on,
            created_on,
            edited_on: created_on,
            hidden: command.hidden,
            allow_comments: command.allow_comments,
            num_comments: 0,
            status: command.status,
        })
    }
}
