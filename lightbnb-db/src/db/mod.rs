/// Database layer for LightBnB
///
/// This module provides connection pooling and the injected data-access
/// context used by callers.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `store`: `Store`, the public data-access surface
/// - Row types are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use lightbnb_db::db::pool::DatabaseConfig;
/// use lightbnb_db::Store;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let store = Store::connect(config).await?;
///     let user = store.get_user_with_id(1).await?;
///     println!("{}", user.name);
///     Ok(())
/// }
/// ```

pub mod pool;
pub mod store;
