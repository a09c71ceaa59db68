/// Error types for the data-access layer
///
/// Every public operation returns `DbResult<T>`. A lookup that matched no
/// rows, an insert rejected by a constraint, and a query that failed outright
/// are always distinct variants.
///
/// # Example
///
/// ```no_run
/// use lightbnb_db::{DbError, Store};
///
/// # async fn example(store: Store) -> Result<(), DbError> {
/// match store.get_user_with_email("guest@example.com").await {
///     Ok(user) => println!("Found user {}", user.id),
///     Err(DbError::NotFound { .. }) => println!("No such user"),
///     Err(err) => return Err(err),
/// }
/// # Ok(())
/// # }
/// ```

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Result type alias for data-access operations
pub type DbResult<T> = Result<T, DbError>;

/// Data-access errors
#[derive(Error, Debug)]
pub enum DbError {
    /// The query succeeded but matched no rows
    ///
    /// Only produced by single-row lookups.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of row that was looked up (e.g. "user")
        entity: &'static str,

        /// Lookup key rendered for display
        key: String,
    },

    /// A write was rejected by a unique, foreign-key, not-null or check constraint
    #[error("Constraint violation{}: {message}", on_constraint(.constraint))]
    ConstraintViolation {
        /// Name of the violated constraint, when the server reports it
        constraint: Option<String>,

        /// Server-provided message
        message: String,
    },

    /// Any other database failure (connectivity, syntax, pool timeout, decode)
    #[error("Query failed: {0}")]
    QueryFailure(#[source] sqlx::Error),

    /// Missing or invalid configuration
    #[error("Database configuration error: {0}")]
    Config(String),
}

fn on_constraint(constraint: &Option<String>) -> String {
    constraint
        .as_deref()
        .map(|name| format!(" on {}", name))
        .unwrap_or_default()
}

impl DbError {
    /// Builds a `NotFound` for the given entity and key
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        DbError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// True if this error means "no matching row"
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// True if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation { .. })
    }

    /// Name of the violated constraint, if any
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::ConstraintViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }
}

/// Classifies sqlx errors into the taxonomy
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "row",
                key: "query returned no rows".to_string(),
            },
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => DbError::ConstraintViolation {
                    constraint: db_err.constraint().map(str::to_string),
                    message: db_err.message().to_string(),
                },
                _ => DbError::QueryFailure(sqlx::Error::Database(db_err)),
            },
            other => DbError::QueryFailure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DbError::not_found("user", "guest@example.com");
        assert_eq!(err.to_string(), "user not found: guest@example.com");
        assert!(err.is_not_found());
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_constraint_violation_display() {
        let err = DbError::ConstraintViolation {
            constraint: Some("users_email_key".to_string()),
            message: "duplicate key value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Constraint violation on users_email_key: duplicate key value"
        );
        assert_eq!(err.constraint(), Some("users_email_key"));

        let err = DbError::ConstraintViolation {
            constraint: None,
            message: "null value".to_string(),
        };
        assert_eq!(err.to_string(), "Constraint violation: null value");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "row not found: query returned no rows");
    }

    #[test]
    fn test_pool_timeout_maps_to_query_failure() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::QueryFailure(sqlx::Error::PoolTimedOut)));
        assert!(err.constraint().is_none());
    }

    #[test]
    fn test_query_failure_keeps_source() {
        use std::error::Error as _;

        let err = DbError::from(sqlx::Error::Protocol("bad message".into()));
        assert!(err.source().is_some());
    }
}
