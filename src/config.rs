/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, CORS 許可、admin key、JWT、uploads など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - production では秘密情報のデフォルト値を使わない
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: u64 = 8 * 60 * 60;
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const DEV_ADMIN_KEY: &str = "changeme";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub admin_key: String,
    pub jwt_secret: String,
    pub access_token_ttl_seconds: u64,

    pub uploads_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("database_max_connections", &self.database_max_connections)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("uploads_dir", &self.uploads_dir)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. `from_env` passes the process env.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_or(&get, "PORT", DEFAULT_PORT)?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = get("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections =
            parse_or(&get, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let app_env = get("APP_ENV")
            .map(|s| AppEnv::parse(&s))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let admin_key = secret(&get, "ADMIN_KEY", DEV_ADMIN_KEY, app_env)?;
        let jwt_secret = secret(&get, "JWT_SECRET", DEV_JWT_SECRET, app_env)?;
        let access_token_ttl_seconds = parse_or(
            &get,
            "ACCESS_TOKEN_TTL_SECONDS",
            DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
        )?;

        let uploads_dir = get("UPLOADS_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("uploads"));
        let max_body_bytes = parse_or(&get, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?;

        Ok(Self {
            addr,
            database_url,
            database_max_connections,
            app_env,
            cors_allowed_origins,
            admin_key,
            jwt_secret,
            access_token_ttl_seconds,
            uploads_dir,
            max_body_bytes,
        })
    }
}

/// Unset → default; set but unparsable → `Invalid`.
fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

fn secret(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    dev_default: &str,
    app_env: AppEnv,
) -> Result<String, ConfigError> {
    match get(key).filter(|s| !s.is_empty()) {
        Some(v) => Ok(v),
        None if app_env.is_production() => Err(ConfigError::Missing(key)),
        None => Ok(dev_default.to_string()),
    }
}
