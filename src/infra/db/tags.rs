use async_trait::async_trait;
use sqlx::Row;

use crate::application::repos::{RepoError, TagsRepo};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl TagsRepo for PostgresRepositories {
    async fn save_tags(
        &self,
        item_id: i64,
        tags: &[String],
        module: &str,
    ) -> Result<(), RepoError> {
        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        // Replace semantics: links owned by this module are rebuilt from the
        // submitted set.
        sqlx::query(
            r#"
            DELETE FROM module_tag_links
            WHERE item_id = $1
              AND tag_id IN (SELECT id FROM module_tags WHERE module = $2)
            "#,
        )
        .bind(item_id)
        .bind(module)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for tag in tags {
            let row = sqlx::query(
                r#"
                INSERT INTO module_tags (module, tag)
                VALUES ($1, $2)
                ON CONFLICT (module, tag) DO UPDATE SET tag = EXCLUDED.tag
                RETURNING id
                "#,
            )
            .bind(module)
            .bind(tag)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
            let tag_id: i64 = row.try_get("id").map_err(map_sqlx_error)?;

            sqlx::query(
                r#"
                INSERT INTO module_tag_links (tag_id, item_id)
                VALUES ($1, $2)
                ON CONFLICT (tag_id, item_id) DO NOTHING
                "#,
            )
            .bind(tag_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }
}
