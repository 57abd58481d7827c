use async_trait::async_trait;

use crate::application::repos::{IndexField, RepoError, SearchIndex};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl SearchIndex for PostgresRepositories {
    async fn save_index(
        &self,
        module: &str,
        item_id: i64,
        fields: &[IndexField],
    ) -> Result<(), RepoError> {
        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        for field in fields {
            sqlx::query(
                r#"
                INSERT INTO search_index (module, item_id, field, value)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (module, item_id, field) DO UPDATE SET value = EXCLUDED.value
                "#,
            )
            .bind(module)
            .bind(item_id)
            .bind(field.name)
            .bind(&field.value)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }
}
