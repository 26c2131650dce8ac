//! Store error classification
//!
//! Driver errors are folded into a small, stable set of kinds here so the
//! HTTP layer never inspects `sqlx` internals or SQLSTATE codes.

use sqlx::error::ErrorKind;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("not found: {resource} {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("unexpected affected row count: expected {expected}, got {actual}")]
    UnexpectedRowCount { expected: u64, actual: u64 },

    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),
}

impl DbError {
    /// Store could not be reached at all (as opposed to rejecting a query).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or_default().to_owned();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => Self::UniqueViolation { constraint },
                    ErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation { constraint },
                    _ => Self::Sqlx(sqlx::Error::Database(db_err)),
                }
            }
            err @ (sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)) => Self::Unavailable(err),
            other => Self::Sqlx(other),
        }
    }
}

/// Check that a single-row statement touched exactly one row.
///
/// Zero rows means the row disappeared after it was looked up.
pub(crate) fn expect_single_row(
    rows_affected: u64,
    resource: &'static str,
    id: i64,
) -> Result<(), DbError> {
    match rows_affected {
        1 => Ok(()),
        0 => Err(DbError::NotFound { resource, id }),
        actual => Err(DbError::UnexpectedRowCount {
            expected: 1,
            actual,
        }),
    }
}
