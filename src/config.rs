use std::env;

use crate::errors::ConfigError;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECONDS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    /// Host of the database server, optionally with `:port`
    pub postgres_url: String,
    pub postgres_user: String,
    pub postgres_pw: String,
    pub postgres_db: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// The four connection settings are required; a missing one aborts
    /// with [`ConfigError::MissingVar`]. Pool settings fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::missing(name));

        Ok(Config {
            postgres_url: required("POSTGRES_URL")?,
            postgres_user: required("POSTGRES_USER")?,
            postgres_pw: required("POSTGRES_PW")?,
            postgres_db: required("POSTGRES_DB")?,
            max_connections: parse_optional(&lookup, "DB_MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            min_connections: parse_optional(&lookup, "DB_MIN_CONNECTIONS")?
                .unwrap_or(DEFAULT_MIN_CONNECTIONS),
            acquire_timeout_seconds: parse_optional(&lookup, "DB_ACQUIRE_TIMEOUT_SECONDS")?
                .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECONDS),
        })
    }

    /// Connection URL with credentials percent-encoded
    pub fn database_url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}/{}",
            urlencoding::encode(&self.postgres_user),
            urlencoding::encode(&self.postgres_pw),
            self.postgres_url,
            self.postgres_db
        )
    }

    /// Same as [`Config::database_url`] with the password masked, for logging
    pub fn redacted_database_url(&self) -> String {
        format!(
            "postgresql://{}:***@{}/{}",
            urlencoding::encode(&self.postgres_user),
            self.postgres_url,
            self.postgres_db
        )
    }
}

fn parse_optional<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::invalid(name, raw.clone(), e.to_string())),
    }
}
