use std::{env, fmt, net::SocketAddr, num::NonZeroU32};

use super::server_bind_address;

/// Pool size used when `DATABASE_MAX_CONNECTIONS` is not set.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Application runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }

    /// Returns the canonical name used for logging/metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Connection settings for the PostgreSQL pool.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

// The url usually carries credentials.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Constructs the configuration by reading and validating environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_value = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let environment = Environment::from_str(&env_value)?;
        let bind_addr = server_bind_address().map_err(ConfigError::BindAddress)?;
        let database = database_from_env()?;

        Ok(Self {
            bind_addr,
            environment,
            database,
        })
    }
}

fn database_from_env() -> Result<DatabaseConfig, ConfigError> {
    let url = env::var("DATABASE_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingDatabaseUrl)?;

    let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
        Ok(raw) => raw
            .parse::<NonZeroU32>()
            .map_err(|_| ConfigError::InvalidMaxConnections(raw))?
            .get(),
        Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    Ok(DatabaseConfig {
        url,
        max_connections,
    })
}

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    BindAddress(std::net::AddrParseError),
    MissingDatabaseUrl,
    InvalidMaxConnections(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnvironment(value) => write!(
                f,
                "APP_ENV must be one of 'development', 'production', or 'test' (got {value})"
            ),
            Self::BindAddress(err) => write!(f, "invalid APP_BIND_ADDR value: {err}"),
            Self::MissingDatabaseUrl => write!(f, "DATABASE_URL must be set"),
            Self::InvalidMaxConnections(value) => write!(
                f,
                "DATABASE_MAX_CONNECTIONS must be a positive integer (got {value})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
