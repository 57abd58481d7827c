use axum::http::StatusCode;

use crate::{
    application::{
        admin::posts::AdminPostError, error::HttpError, meta::MetaError,
    },
    infra::http::repo_error_to_http,
};

pub(super) fn admin_post_error(source: &'static str, err: AdminPostError) -> HttpError {
    match err {
        AdminPostError::ConstraintViolation(field) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Submission could not be processed",
            format!("Invalid field `{field}`"),
        ),
        AdminPostError::Meta(MetaError::Slug(err)) => HttpError::from_error(
            source,
            StatusCode::BAD_REQUEST,
            "Submission could not be processed",
            &err,
        ),
        AdminPostError::Meta(MetaError::Repo(repo)) => repo_error_to_http(source, repo),
        AdminPostError::Image(err) => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Image storage failed",
            &err,
        ),
        AdminPostError::Repo(repo) => repo_error_to_http(source, repo),
    }
}
