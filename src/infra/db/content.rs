use async_trait::async_trait;
use sqlx::Row;

use crate::{
    application::repos::{ContentRepo, NewRevisionParams, RepoError},
    domain::{entities::CategoryRecord, language::Language},
};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl ContentRepo for PostgresRepositories {
    async fn next_item_id(&self) -> Result<i64, RepoError> {
        let row = sqlx::query("SELECT nextval('blog_item_id_seq') AS id")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        row.try_get("id").map_err(map_sqlx_error)
    }

    async fn insert_revision(&self, params: NewRevisionParams) -> Result<i64, RepoError> {
        let row = sqlx::query(
            r#"
            INSERT INTO blog_revisions (
                item_id,
                meta_id,
                category_id,
                user_id,
                language,
                title,
                introduction,
                text,
                publish_on,
                created_on,
                edited_on,
                hidden,
                allow_comments,
                num_comments,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING revision_id
            "#,
        )
        .bind(params.item_id)
        .bind(params.meta_id)
        .bind(params.category_id)
        .bind(params.user_id)
        .bind(&params.language)
        .bind(&params.title)
        .bind(&params.introduction)
        .bind(&params.text)
        .bind(params.publish_on)
        .bind(params.created_on)
        .bind(params.edited_on)
        .bind(params.hidden)
        .bind(params.allow_comments)
        .bind(params.num_comments)
        .bind(params.status)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.try_get("revision_id").map_err(map_sqlx_error)
    }

    async fn set_revision_image(&self, revision_id: i64, image: &str) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE blog_revisions SET image = $2 WHERE revision_id = $1")
            .bind(revision_id)
            .bind(image)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn categories(&self, language: &Language) -> Result<Vec<CategoryRecord>, RepoError> {
        let rows =
            sqlx::query("SELECT id, title FROM blog_categories WHERE language = $1 ORDER BY title")
                .bind(language)
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(CategoryRecord {
                    id: row.try_get("id").map_err(map_sqlx_error)?,
                    title: row.try_get("title").map_err(map_sqlx_error)?,
                })
            })
            .collect()
    }
}
