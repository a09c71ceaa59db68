/// Data-access context
///
/// `Store` owns a handle to the connection pool and exposes the operations
/// callers use. It is cheap to clone; every clone shares the same pool. Each
/// call checks out one connection for one statement.
///
/// Failures are logged and returned. A lookup with no match is
/// `DbError::NotFound`, a rejected insert is `DbError::ConstraintViolation`,
/// and anything else is `DbError::QueryFailure`.
///
/// # Example
///
/// ```no_run
/// use lightbnb_db::models::user::CreateUser;
/// use lightbnb_db::query::PropertySearch;
/// use lightbnb_db::{DatabaseConfig, Store};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Store::connect(DatabaseConfig::from_env()?).await?;
///
/// let user = store
///     .add_user(CreateUser {
///         name: "Eva Stanley".to_string(),
///         email: "eva@example.com".to_string(),
///         password: "$2a$10$...".to_string(),
///     })
///     .await?;
///
/// let search = PropertySearch {
///     city: Some("Vancouver".to_string()),
///     minimum_rating: Some(4.0),
///     ..Default::default()
/// };
/// for row in store.get_all_properties(&search, 10).await? {
///     println!("{} ({:?})", row.property.title, row.average_rating);
/// }
///
/// let reservations = store.get_all_reservations(user.id, 10).await?;
/// println!("{} reservations", reservations.len());
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use tracing::{debug, error, warn};

use super::pool::{self, DatabaseConfig, PoolStats};
use crate::error::{DbError, DbResult};
use crate::models::property::{NewProperty, Property, PropertyWithRating};
use crate::models::reservation::ReservationWithProperty;
use crate::models::user::{CreateUser, User};
use crate::query::{PropertySearch, DEFAULT_LIMIT};

/// Injected data-access context backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a pool from `config` and wraps it
    ///
    /// # Errors
    ///
    /// Returns `DbError::QueryFailure` if the database is unreachable or the
    /// health check fails.
    pub async fn connect(config: DatabaseConfig) -> DbResult<Self> {
        let pool = pool::create_pool(config).await.map_err(|e| {
            error!(error = %e, "Failed to create database pool");
            DbError::QueryFailure(e)
        })?;
        Ok(Self::new(pool))
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs `SELECT 1` against the pool
    pub async fn health_check(&self) -> DbResult<()> {
        pool::health_check(&self.pool)
            .await
            .map_err(|e| log_failure("health_check", e))
    }

    /// Current pool usage
    pub fn stats(&self) -> PoolStats {
        pool::get_pool_stats(&self.pool)
    }

    /// Closes the pool once all checked-out connections are returned
    pub async fn close(self) {
        pool::close_pool(self.pool).await;
    }

    /// Fetches the user with this exact email
    ///
    /// # Errors
    ///
    /// `DbError::NotFound` if no user has the email.
    pub async fn get_user_with_email(&self, email: &str) -> DbResult<User> {
        User::find_by_email(&self.pool, email)
            .await
            .map_err(|e| log_failure("get_user_with_email", e))?
            .ok_or_else(|| DbError::not_found("user", email))
    }

    /// Fetches the user with this id
    ///
    /// # Errors
    ///
    /// `DbError::NotFound` if no user has the id.
    pub async fn get_user_with_id(&self, id: i32) -> DbResult<User> {
        User::find_by_id(&self.pool, id)
            .await
            .map_err(|e| log_failure("get_user_with_id", e))?
            .ok_or_else(|| DbError::not_found("user", id))
    }

    /// Inserts a user and returns it with its generated id
    ///
    /// # Errors
    ///
    /// `DbError::ConstraintViolation` if the email is already registered.
    pub async fn add_user(&self, user: CreateUser) -> DbResult<User> {
        let user = User::create(&self.pool, user)
            .await
            .map_err(|e| log_failure("add_user", e))?;
        debug!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Lists up to `limit` reservations for a guest, earliest first
    pub async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: i64,
    ) -> DbResult<Vec<ReservationWithProperty>> {
        let rows = ReservationWithProperty::list_for_guest(&self.pool, guest_id, limit)
            .await
            .map_err(|e| log_failure("get_all_reservations", e))?;
        debug!(guest_id, count = rows.len(), "Reservations fetched");
        Ok(rows)
    }

    /// `get_all_reservations` with the default limit of 10
    pub async fn get_all_reservations_default(
        &self,
        guest_id: i32,
    ) -> DbResult<Vec<ReservationWithProperty>> {
        self.get_all_reservations(guest_id, DEFAULT_LIMIT).await
    }

    /// Searches properties, cheapest first, capped at `limit`
    pub async fn get_all_properties(
        &self,
        search: &PropertySearch,
        limit: i64,
    ) -> DbResult<Vec<PropertyWithRating>> {
        let rows = Property::search(&self.pool, search, limit)
            .await
            .map_err(|e| log_failure("get_all_properties", e))?;
        debug!(count = rows.len(), "Properties fetched");
        Ok(rows)
    }

    /// `get_all_properties` with the default limit of 10
    pub async fn get_all_properties_default(
        &self,
        search: &PropertySearch,
    ) -> DbResult<Vec<PropertyWithRating>> {
        self.get_all_properties(search, DEFAULT_LIMIT).await
    }

    /// Inserts a property and returns it with its generated id
    ///
    /// # Errors
    ///
    /// `DbError::ConstraintViolation` if `owner_id` does not reference a user.
    pub async fn add_property(&self, property: NewProperty) -> DbResult<Property> {
        let property = Property::create(&self.pool, property)
            .await
            .map_err(|e| log_failure("add_property", e))?;
        debug!(property_id = property.id, "Property created");
        Ok(property)
    }
}

/// Classifies and logs a failed operation
fn log_failure(operation: &'static str, err: sqlx::Error) -> DbError {
    let err = DbError::from(err);
    match &err {
        DbError::ConstraintViolation { constraint, .. } => {
            warn!(operation, constraint = ?constraint, error = %err, "Constraint violation");
        }
        _ => {
            error!(operation, error = %err, "Database operation failed");
        }
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_failure_classifies() {
        assert!(matches!(
            log_failure("test", sqlx::Error::PoolClosed),
            DbError::QueryFailure(sqlx::Error::PoolClosed)
        ));
        assert_eq!(
            log_failure("test", sqlx::Error::RowNotFound).to_string(),
            "row not found: query returned no rows"
        );
    }

    #[tokio::test]
    async fn test_lazy_store_is_cloneable() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://lightbnb@localhost:5432/lightbnb")
            .unwrap();
        let store = Store::new(pool);
        let cloned = store.clone();

        assert_eq!(cloned.stats().total_connections, 0);
    }
}
