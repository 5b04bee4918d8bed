use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use validator::Validate;

const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SQLITE_PATH: &str = "pastery.db";
const CONFIG_DIR: &str = "config";
const DEV_DEFAULT_JWT_SECRET: &str =
    "development_only_jwt_secret_change_this_before_deploying_anywhere";

/// Application configuration, loaded from `config/*.toml` files layered with
/// `APP__*` environment variables.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Postgres connection URL. When unset, the embedded SQLite backend is
    /// used instead (see [`AppConfig::effective_database_url`]).
    #[serde(default)]
    pub database_url: Option<String>,

    /// Path of the SQLite database file used when no `database_url` is given.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,

    /// JWT signing secret.
    #[validate(length(min = 32))]
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Session token lifetime in seconds.
    #[serde(default = "default_jwt_expiration_secs")]
    pub jwt_expiration_secs: u64,

    /// Password assigned to customer accounts provisioned during checkout.
    #[serde(default = "default_customer_password")]
    pub default_customer_password: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub log_json: bool,

    /// Comma-separated allowed CORS origins; empty means permissive.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Insert demo products/gallery/admin rows when the catalog is empty.
    #[serde(default = "default_true")]
    pub seed_on_start: bool,

    /// DB pool sizing.
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
}

fn default_sqlite_path() -> String {
    DEFAULT_SQLITE_PATH.to_string()
}
fn default_jwt_secret() -> String {
    DEV_DEFAULT_JWT_SECRET.to_string()
}
fn default_jwt_expiration_secs() -> u64 {
    24 * 60 * 60
}
fn default_customer_password() -> String {
    "pastery123".to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_true() -> bool {
    true
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}

impl AppConfig {
    /// Connection URL for the configured backend: the Postgres URL when one is
    /// set, otherwise the embedded SQLite file. This is the only place the
    /// backend choice is made; everything downstream sees one connection.
    pub fn effective_database_url(&self) -> String {
        match self.database_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => format!("sqlite://{}?mode=rwc", self.sqlite_path),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "test"
    }
}

/// Load configuration from `config/default.toml`, an optional
/// `config/<environment>.toml`, and `APP__*` environment variables, in that
/// order of increasing precedence.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment =
        std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder();
    let default_path = Path::new(CONFIG_DIR).join("default.toml");
    if default_path.exists() {
        builder = builder.add_source(File::from(default_path));
    }
    let env_path = Path::new(CONFIG_DIR).join(format!("{environment}.toml"));
    if env_path.exists() {
        builder = builder.add_source(File::from(env_path));
    }
    builder = builder.add_source(Environment::with_prefix("APP").separator("__"));

    let cfg: AppConfig = builder.build()?.try_deserialize()?;
    cfg.validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {e}")))?;

    if cfg.jwt_secret == DEV_DEFAULT_JWT_SECRET && !cfg.is_development() {
        return Err(ConfigError::Message(
            "APP__JWT_SECRET must be set outside development".to_string(),
        ));
    }

    Ok(cfg)
}

/// Initialise the global tracing subscriber.
pub fn init_tracing(log_level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    info!(log_level, json, "tracing initialised");
}
