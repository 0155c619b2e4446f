use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// S3-compatible object storage configuration for photo uploads
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL used to build object URLs (defaults to endpoint)
    pub public_endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name for storing photos
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix every photo key is stored under (e.g., "photos")
    pub key_prefix: String,
}

/// Limits applied to uploaded image payloads
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Upper bound for a single upload in bytes. Category limits can only lower it.
    pub max_file_size: usize,
}

/// Read a variable, falling back to `default` when it is unset
fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse a numeric variable, falling back to `default` when it is unset
fn env_number<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number, got '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping empty entries
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env(),
            storage: StorageConfig::from_env()?,
            upload: UploadConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: env_or("HOST", "127.0.0.1"),
            port: env_number("PORT", 3000u16)?,
            cors_allowed_origins: parse_origins(&env_or("CORS_ALLOWED_ORIGINS", "*")),
            max_request_body_size: env_number(
                "MAX_REQUEST_BODY_SIZE",
                Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
            )?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
        let max_connections = env_number("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?;
        let min_connections = env_number("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?;

        if min_connections > max_connections {
            return Err("DB_MIN_CONNECTIONS must not exceed DB_MAX_CONNECTIONS".to_string());
        }

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs: env_number(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: env_number("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: env_number("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        // Only use credentials if they are non-empty
        let non_empty = |key: &str| env::var(key).ok().filter(|s| !s.is_empty());

        Self {
            username: non_empty("SWAGGER_USERNAME"),
            password: non_empty("SWAGGER_PASSWORD"),
            title: env_or("SWAGGER_TITLE", "Eyewear Admin API"),
            version: env_or("SWAGGER_VERSION", "0.1.0"),
            description: env_or(
                "SWAGGER_DESCRIPTION",
                "Admin API for photos, products and lenses of the eyewear storefront",
            ),
        }
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint = env_or("STORAGE_ENDPOINT", "http://localhost:9000");
        // Public endpoint defaults to the main endpoint if not specified
        let public_endpoint = env_or("STORAGE_PUBLIC_ENDPOINT", &endpoint);
        let key_prefix = normalize_key_prefix(&env_or("STORAGE_KEY_PREFIX", "photos"))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            public_endpoint: public_endpoint.trim_end_matches('/').to_string(),
            access_key: env_or("STORAGE_ACCESS_KEY", "minioadmin"),
            secret_key: env_or("STORAGE_SECRET_KEY", "minioadmin"),
            bucket: env_or("STORAGE_BUCKET", "photos"),
            region: env_or("STORAGE_REGION", "us-east-1"),
            key_prefix,
        })
    }
}

/// Key prefixes are stored without surrounding slashes and may not be empty
fn normalize_key_prefix(raw: &str) -> Result<String, String> {
    let prefix = raw.trim().trim_matches('/');
    if prefix.is_empty() {
        return Err("STORAGE_KEY_PREFIX must not be empty".to_string());
    }
    Ok(prefix.to_string())
}

impl UploadConfig {
    pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let max_file_size = env_number("UPLOAD_MAX_FILE_SIZE", Self::DEFAULT_MAX_FILE_SIZE)?;

        if max_file_size == 0 {
            return Err("UPLOAD_MAX_FILE_SIZE must be greater than zero".to_string());
        }

        Ok(Self { max_file_size })
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }
}
