pub mod config;
pub mod query;

// Re-export commonly used types
pub use config::ConfigError;
pub use query::QueryError;
