use std::env;
use std::fmt;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub store: StoreConfig,
    pub geocoding: GeocodingConfig,
    pub auth: AuthConfig,
    pub rentals: RentalConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let backend = StoreBackend::parse(
            &env::var("APP_STORE_BACKEND").unwrap_or_else(|_| "mongodb".to_string()),
        )?;
        let store = StoreConfig {
            backend,
            uri: env_or("APP_MONGO_URI", "mongodb://localhost:27017"),
            database: env_or("APP_DATABASE", "RentEase"),
            users_collection: env_or("APP_USERS_COLLECTION", "users"),
            properties_collection: env_or("APP_PROPERTIES_COLLECTION", "properties"),
            requests_collection: env_or("APP_REQUESTS_COLLECTION", "rentRequest"),
        };

        let geocoding = GeocodingConfig {
            enabled: parse_flag("APP_PINCODE_LOOKUP", true)?,
            base_url: env_or("APP_PINCODE_API_URL", "https://api.postalpincode.in/pincode"),
            timeout: Duration::from_secs(parse_count("APP_PINCODE_TIMEOUT_SECS", 5u64)?),
        };

        let admin = match (env::var("APP_ADMIN_USERNAME"), env::var("APP_ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) if !username.trim().is_empty() => Some(AdminSeed {
                username: username.trim().to_string(),
                password,
            }),
            _ => None,
        };

        let auth = AuthConfig {
            max_login_attempts: parse_count("APP_LOGIN_ATTEMPTS", 3u32)?,
            admin,
        };

        let rentals = RentalConfig {
            rented_sync_attempts: parse_count("APP_RENTED_SYNC_ATTEMPTS", 3u32)?,
        };

        let log_level = env_or("APP_LOG_LEVEL", "warn");

        Ok(Self {
            environment,
            store,
            geocoding,
            auth,
            rentals,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Positive integer setting; values that overflow `T` are rejected rather than truncated.
fn parse_count<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    match env::var(key) {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(parsed) if parsed != T::default() => Ok(parsed),
            _ => Err(ConfigError::InvalidNumber { key, value }),
        },
        Err(_) => Ok(default),
    }
}

fn parse_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { key, value }),
        },
        Err(_) => Ok(default),
    }
}

/// Which persistence gateway backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidStoreBackend(other.to_string())),
        }
    }
}

/// Document store connection and collection names.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub uri: String,
    pub database: String,
    pub users_collection: String,
    pub properties_collection: String,
    pub requests_collection: String,
}

/// Pincode lookup service settings.
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub max_login_attempts: u32,
    pub admin: Option<AdminSeed>,
}

/// Credentials for the administrator account created at startup when missing.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RentalConfig {
    pub rented_sync_attempts: u32,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidStoreBackend(String),
    InvalidNumber { key: &'static str, value: String },
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidStoreBackend(value) => write!(
                f,
                "APP_STORE_BACKEND must be 'mongodb' or 'memory' (got '{value}')"
            ),
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive integer (got '{value}')")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
