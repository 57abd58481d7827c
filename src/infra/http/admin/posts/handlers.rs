//! HTTP handlers for the create-post action.

use axum::{
    Json,
    extract::{Extension, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::application::auth::AdminPrincipal;
use crate::domain::entities::BlogPostRecord;
use crate::domain::language::Language;
use crate::domain::types::PublicationStatus;

use super::super::AdminState;
use super::errors::admin_post_error;
use super::forms::PostCreateRequest;
use super::views::{PostFormErrors, build_form_view};

const SOURCE_BASE: &str = "infra::http::admin_posts";

#[derive(Debug, Deserialize)]
pub(crate) struct NewPostQuery {
    pub(crate) language: Option<Language>,
    /// Pre-selects the category dropdown.
    pub(crate) category: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageQuery {
    pub(crate) language: Option<Language>,
}

pub(crate) async fn new_post(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Query(query): Query<NewPostQuery>,
) -> Response {
    let language = query
        .language
        .unwrap_or_else(|| state.site.default_language.clone());

    match state.posts.form_context(&language).await {
        Ok(context) => Json(build_form_view(
            context,
            &principal,
            language,
            query.category,
            &state.site,
        ))
        .into_response(),
        Err(err) => admin_post_error(SOURCE_BASE, err).into_response(),
    }
}

pub(crate) async fn create_post(
    State(state): State<AdminState>,
    Extension(principal): Extension<AdminPrincipal>,
    Query(query): Query<LanguageQuery>,
    Json(form): Json<PostCreateRequest>,
) -> Response {
    let language = query
        .language
        .unwrap_or_else(|| state.site.default_language.clone());

    let command = match form.validate(&principal, &state.site, language) {
        Ok(command) => command,
        Err(errors) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(PostFormErrors { errors }),
            )
                .into_response();
        }
    };

    match state.posts.create_post(command).await {
        Ok(post) => redirect_after_create(&post),
        Err(err) => admin_post_error(SOURCE_BASE, err).into_response(),
    }
}

/// Active items land on the listing with their row highlighted; drafts go
/// straight to the edit view of the saved revision.
fn redirect_after_create(post: &BlogPostRecord) -> Response {
    let highlight = format!("row-{}", post.revision_id);

    let target = match post.status {
        PublicationStatus::Active => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("report", "added")
                .append_pair("var", &post.title)
                .append_pair("highlight", &highlight)
                .finish();
            format!("/blog/posts?{query}")
        }
        PublicationStatus::Draft => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("report", "saved-as-draft")
                .append_pair("var", &post.title)
                .append_pair("draft", &post.revision_id.to_string())
                .append_pair("highlight", &highlight)
                .finish();
            format!("/blog/posts/{}/edit?{query}", post.item_id)
        }
    };

    Redirect::to(&target).into_response()
}
