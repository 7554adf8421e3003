use thiserror::Error;

/// Errors raised while loading configuration at startup.
///
/// These are fatal: nothing should attempt a database connection after one
/// of them is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Expected environment variable '{name}' not set.")]
    MissingVar { name: &'static str },

    #[error("Invalid value '{value}' for environment variable '{name}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn missing(name: &'static str) -> Self {
        Self::MissingVar { name }
    }

    pub fn invalid<S: Into<String>, R: Into<String>>(name: &'static str, value: S, reason: R) -> Self {
        Self::InvalidValue {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
