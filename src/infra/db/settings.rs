use async_trait::async_trait;
use sqlx::{Row, types::Json};

use crate::{
    application::repos::{RepoError, SettingsStore},
    domain::types::SettingValue,
};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl SettingsStore for PostgresRepositories {
    async fn get(&self, module: &str, key: &str) -> Result<Option<SettingValue>, RepoError> {
        let row = sqlx::query(
            "SELECT value FROM module_settings WHERE module = $1 AND name = $2",
        )
        .bind(module)
        .bind(key)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| {
            row.try_get::<Json<SettingValue>, _>("value")
                .map(|value| value.0)
                .map_err(map_sqlx_error)
        })
        .transpose()
    }

    async fn set(&self, module: &str, key: &str, value: SettingValue) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO module_settings (module, name, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (module, name) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(module)
        .bind(key)
        .bind(Json(value))
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
