use async_trait::async_trait;
use sqlx::Row;

use crate::{
    application::repos::{MetaRepo, NewMetaParams, RepoError},
    domain::language::Language,
};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl MetaRepo for PostgresRepositories {
    async fn insert_meta(&self, params: NewMetaParams) -> Result<i64, RepoError> {
        let row = sqlx::query(
            r#"
            INSERT INTO meta (url, title, description, keywords, language)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&params.url)
        .bind(&params.title)
        .bind(&params.description)
        .bind(&params.keywords)
        .bind(&params.language)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.try_get("id").map_err(map_sqlx_error)
    }

    async fn slug_exists(&self, url: &str, language: &Language) -> Result<bool, RepoError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM meta WHERE url = $1 AND language = $2) AS taken",
        )
        .bind(url)
        .bind(language)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.try_get("taken").map_err(map_sqlx_error)
    }
}
