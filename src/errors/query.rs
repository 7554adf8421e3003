use thiserror::Error;

/// Errors returned by the query façade
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("View '{view}' returned no rows")]
    EmptyView { view: String },

    #[error("Non existent state name: {name}")]
    UnknownState { name: String },

    #[error("Invalid SQL identifier '{identifier}'")]
    InvalidIdentifier { identifier: String },

    #[error("Column '{column}' does not exist in view '{view}'")]
    ColumnNotInView { column: &'static str, view: String },

    #[error("Value of column '{column}' is not an integer")]
    NotAnInteger { column: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl QueryError {
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn empty_view<S: Into<String>>(view: S) -> Self {
        Self::EmptyView { view: view.into() }
    }

    pub fn unknown_state<S: Into<String>>(name: S) -> Self {
        Self::UnknownState { name: name.into() }
    }

    pub fn invalid_identifier<S: Into<String>>(identifier: S) -> Self {
        Self::InvalidIdentifier { identifier: identifier.into() }
    }

    /// Whether the error is a "nothing matched" outcome rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            QueryError::NotFound { .. } | QueryError::EmptyView { .. } | QueryError::UnknownState { .. }
        )
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
