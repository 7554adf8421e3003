pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod test_utils;

pub use config::Config;
pub use db::Database;
pub use errors::{ConfigError, QueryError};
