//! Admin HTTP surface for the blog module.

pub(crate) mod posts;
pub(crate) mod settings;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware as axum_middleware,
    response::Response,
    routing::{get, post},
};
use chrono_tz::Tz;
use url::Url;

use crate::application::admin::posts::AdminPostService;
use crate::application::admin::settings::AdminSettingsService;
use crate::application::repos::UserDirectory;
use crate::domain::language::Language;
use crate::infra::db::PostgresRepositories;
use crate::infra::http::middleware;

/// Site-wide request context the admin surface needs: the default working
/// language, the timezone publish times are entered in, and the public base
/// URL when one is configured.
#[derive(Clone)]
pub struct SiteContext {
    pub default_language: Language,
    pub timezone: Tz,
    pub public_url: Option<Url>,
}

#[derive(Clone)]
pub struct AdminState {
    pub db: Arc<PostgresRepositories>,
    pub posts: Arc<AdminPostService>,
    pub settings: Arc<AdminSettingsService>,
    pub users: Arc<dyn UserDirectory>,
    pub site: SiteContext,
}

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/blog/posts/new", get(posts::handlers::new_post))
        .route("/blog/posts", post(posts::handlers::create_post))
        .route(
            "/blog/settings",
            get(settings::handlers::settings_form).post(settings::handlers::update_settings),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ))
        .route("/healthz", get(db_health))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .with_state(state)
}

async fn db_health(State(state): State<AdminState>) -> Response {
    super::db_health_response(state.db.health_check().await)
}
