//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, num::NonZeroU32, path::PathBuf, str::FromStr};

use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::language::Language;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "redazione";
const ENV_PREFIX: &str = "REDAZIONE";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_ADMIN_PORT: u16 = 3001;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_IMAGES_DIR: &str = "files/blog/images";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_TIMEZONE: &str = "UTC";

/// Command-line arguments for the redazione binary.
#[derive(Debug, Parser)]
#[command(name = "redazione", version, about = "Blog module admin backend")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "REDAZIONE_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the admin HTTP service.
    Serve(Box<ServeArgs>),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the admin listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the admin listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the log level (`error`..`trace`).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Override the log format (`json` or `compact`).
    #[arg(long = "log-format", value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database connection pool size.
    #[arg(long = "database-max-connections", value_name = "N")]
    pub database_max_connections: Option<u32>,

    /// Override the directory revision images are stored under.
    #[arg(long = "images-dir", value_name = "PATH")]
    pub images_dir: Option<PathBuf>,

    /// Override the default working language.
    #[arg(long = "site-language", value_name = "CODE")]
    pub site_language: Option<String>,

    /// Override the timezone publish times are entered in.
    #[arg(long = "site-timezone", value_name = "TZ")]
    pub site_timezone: Option<String>,

    /// Override the public base URL of the front end.
    #[arg(long = "site-public-url", value_name = "URL")]
    pub site_public_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub server: RawServerSettings,
    pub logging: RawLoggingSettings,
    pub database: RawDatabaseSettings,
    pub images: RawImagesSettings,
    pub site: RawSiteSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLoggingSettings {
    pub level: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawDatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawImagesSettings {
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawSiteSettings {
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub public_url: Option<String>,
}

impl RawSettings {
    pub fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = &overrides.server_host {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = Some(level.clone());
        }
        if let Some(format) = &overrides.log_format {
            self.logging.format = Some(format.clone());
        }
        if let Some(url) = &overrides.database_url {
            self.database.url = Some(url.clone());
        }
        if let Some(max_connections) = overrides.database_max_connections {
            self.database.max_connections = Some(max_connections);
        }
        if let Some(directory) = &overrides.images_dir {
            self.images.directory = Some(directory.clone());
        }
        if let Some(language) = &overrides.site_language {
            self.site.language = Some(language.clone());
        }
        if let Some(timezone) = &overrides.site_timezone {
            self.site.timezone = Some(timezone.clone());
        }
        if let Some(public_url) = &overrides.site_public_url {
            self.site.public_url = Some(public_url.clone());
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub images: ImageSettings,
    pub site: SiteSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub admin_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct ImageSettings {
    pub directory: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub default_language: Language,
    pub timezone: Tz,
    pub public_url: Option<Url>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("invalid listen address `{value}`")]
    InvalidAddress { value: String },
    #[error("invalid log level `{value}`")]
    InvalidLogLevel { value: String },
    #[error("invalid log format `{value}` (expected `json` or `compact`)")]
    InvalidLogFormat { value: String },
    #[error("invalid default language `{value}`")]
    InvalidLanguage { value: String },
    #[error("invalid timezone `{value}`")]
    InvalidTimezone { value: String },
    #[error("invalid public url `{value}`")]
    InvalidPublicUrl { value: String },
    #[error("database pool size must be greater than zero")]
    InvalidPoolSize,
}

impl Settings {
    pub fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let host = raw.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = raw.server.port.unwrap_or(DEFAULT_ADMIN_PORT);
        let admin_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|_| LoadError::InvalidAddress {
                value: format!("{host}:{port}"),
            })?;

        let level = match raw.logging.level {
            Some(value) => LevelFilter::from_str(&value)
                .map_err(|_| LoadError::InvalidLogLevel { value })?,
            None => LevelFilter::INFO,
        };
        let format = match raw.logging.format.as_deref() {
            None | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(LoadError::InvalidLogFormat {
                    value: other.to_string(),
                });
            }
        };

        let max_connections = raw
            .database
            .max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let max_connections =
            NonZeroU32::new(max_connections).ok_or(LoadError::InvalidPoolSize)?;

        let directory = raw
            .images
            .directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR));

        let language_raw = raw
            .site
            .language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let default_language = language_raw
            .parse::<Language>()
            .map_err(|_| LoadError::InvalidLanguage {
                value: language_raw,
            })?;

        let timezone_raw = raw
            .site
            .timezone
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_raw
            .parse::<Tz>()
            .map_err(|_| LoadError::InvalidTimezone {
                value: timezone_raw,
            })?;

        let public_url = raw
            .site
            .public_url
            .map(|value| {
                Url::parse(&value).map_err(|_| LoadError::InvalidPublicUrl { value })
            })
            .transpose()?;

        Ok(Settings {
            server: ServerSettings { admin_addr },
            logging: LoggingSettings { level, format },
            database: DatabaseSettings {
                url: raw.database.url,
                max_connections,
            },
            images: ImageSettings { directory },
            site: SiteSettings {
                default_language,
                timezone,
                public_url,
            },
        })
    }
}

/// Parse CLI arguments and load the layered configuration.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli_args = CliArgs::parse();
    let settings = load(&cli_args)?;
    Ok((cli_args, settings))
}

fn load(cli_args: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = &cli_args.config_file {
        builder = builder.add_source(File::from(path.clone()));
    }

    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let mut raw: RawSettings = config.try_deserialize()?;

    if let Some(Command::Serve(args)) = &cli_args.command {
        raw.apply_serve_overrides(&args.overrides);
    }

    Settings::from_raw(raw)
}
