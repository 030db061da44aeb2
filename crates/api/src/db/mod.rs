//! Database operations for the catalog `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `category` - Product categories
//! - `product` - Products, optionally belonging to a category
//! - `tag` - Free-form product tags
//! - `product_tag` - Product/tag join rows
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p storehouse-cli -- migrate
//! ```

pub mod categories;
pub mod product_tags;
pub mod products;
pub mod tags;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use product_tags::ProductTagRepository;
pub use products::ProductRepository;
pub use tags::TagRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// The row violates a foreign key, `CHECK` or `NOT NULL` constraint.
    ///
    /// These are caused by the request (an unknown tag id, a negative stock)
    /// rather than by the database being unavailable.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A value does not fit its column (SQLSTATE class 22), such as a name
    /// longer than the column allows.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// Returns `true` if the error was caused by the submitted data.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Constraint(_) | Self::InvalidData(_))
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && matches!(
                db_err.kind(),
                ErrorKind::ForeignKeyViolation
                    | ErrorKind::CheckViolation
                    | ErrorKind::NotNullViolation
            )
        {
            let detail = db_err
                .constraint()
                .map_or_else(|| db_err.message().to_owned(), str::to_owned);
            return Self::Constraint(detail);
        }
        if let sqlx::Error::Database(ref db_err) = err
            && is_data_exception(db_err.code().as_deref())
        {
            return Self::InvalidData(db_err.message().to_owned());
        }
        Self::Database(err)
    }
}

/// SQLSTATE class 22: data exceptions such as truncation or numeric overflow.
fn is_data_exception(code: Option<&str>) -> bool {
    code.is_some_and(|code| code.starts_with("22"))
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(max_connections.min(2))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_not_constraint_violations() {
        let err = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Database(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_row_not_found_is_a_database_error() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn test_constraint_display() {
        let err = RepositoryError::Constraint("product_tag_tag_id_fkey".to_string());
        assert_eq!(
            err.to_string(),
            "constraint violation: product_tag_tag_id_fkey"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_data_exception_codes() {
        // string_data_right_truncation, numeric_value_out_of_range
        assert!(is_data_exception(Some("22001")));
        assert!(is_data_exception(Some("22003")));
        // unique_violation, connection_failure
        assert!(!is_data_exception(Some("23505")));
        assert!(!is_data_exception(Some("08006")));
        assert!(!is_data_exception(None));
    }

    #[test]
    fn test_invalid_data_is_a_client_error() {
        let err = RepositoryError::InvalidData(
            "value too long for type character varying(255)".to_string(),
        );
        assert!(err.is_client_error());
    }
}
