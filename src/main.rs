use std::{process, sync::Arc};

use redazione::{
    application::{
        admin::{posts::AdminPostService, settings::AdminSettingsService},
        error::AppError,
        meta::MetaService,
        repos::{ContentRepo, MetaRepo, SearchIndex, SettingsStore, TagsRepo, UserDirectory},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{AdminState, SiteContext, build_admin_router},
        images::{ImageStore, LanczosThumbnailer, ThumbnailGenerator},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let content: Arc<dyn ContentRepo> = repositories.clone();
    let settings_store: Arc<dyn SettingsStore> = repositories.clone();
    let users: Arc<dyn UserDirectory> = repositories.clone();
    let tags: Arc<dyn TagsRepo> = repositories.clone();
    let search: Arc<dyn SearchIndex> = repositories.clone();
    let meta: Arc<dyn MetaRepo> = repositories.clone();

    let thumbnailer: Arc<dyn ThumbnailGenerator> = Arc::new(LanczosThumbnailer);
    let images = Arc::new(ImageStore::new(
        settings.images.directory.clone(),
        thumbnailer,
    ));

    let posts = Arc::new(AdminPostService::new(
        content,
        settings_store.clone(),
        users.clone(),
        tags,
        search,
        MetaService::new(meta),
        images,
    ));
    let admin_settings = Arc::new(AdminSettingsService::new(settings_store));

    let state = AdminState {
        db: repositories,
        posts,
        settings: admin_settings,
        users,
        site: SiteContext {
            default_language: settings.site.default_language.clone(),
            timezone: settings.site.timezone,
            public_url: settings.site.public_url.clone(),
        },
    };

    let router = build_admin_router(state);
    let listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(addr = %settings.server.admin_addr, "admin surface listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}
