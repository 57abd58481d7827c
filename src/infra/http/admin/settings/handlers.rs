//! HTTP handlers for the module settings action.

use axum::{
    Json,
    extract::{Extension, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::application::auth::AdminPrincipal;
use crate::domain::language::Language;

use super::super::AdminState;
use super::errors::admin_settings_error;
use super::forms::SettingsUpdateRequest;
use super::views::{SettingsFormErrors, build_settings_view};

const SOURCE_BASE: &str = "infra::http::admin_settings";

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageQuery {
    pub(crate) language: Option<Language>,
}

pub(crate) async fn settings_form(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Query(query): Query<LanguageQuery>,
) -> Response {
    let language = query
        .language
        .unwrap_or_else(|| state.site.default_language.clone());

    match state.settings.load(&language).await {
        Ok(snapshot) => Json(build_settings_view(
            snapshot,
            principal.is_god,
            &state.site,
        ))
        .into_response(),
        Err(err) => admin_settings_error(SOURCE_BASE, err).into_response(),
    }
}

pub(crate) async fn update_settings(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Query(query): Query<LanguageQuery>,
    Json(form): Json<SettingsUpdateRequest>,
) -> Response {
    let language = query
        .language
        .unwrap_or_else(|| state.site.default_language.clone());

    let command = match form.validate() {
        Ok(command) => command,
        Err(errors) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(SettingsFormErrors { errors }),
            )
                .into_response();
        }
    };

    match state
        .settings
        .update(&language, principal.is_god, command)
        .await
    {
        Ok(()) => Redirect::to("/blog/settings?report=saved").into_response(),
        Err(err) => admin_settings_error(SOURCE_BASE, err).into_response(),
    }
}
