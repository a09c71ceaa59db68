/// Database models for LightBnB
///
/// Row types for each table plus the raw queries behind them. Model
/// functions return `sqlx::Error`; `Store` classifies those into `DbError`.
///
/// # Models
///
/// - `user`: Registered users
/// - `property`: Rental listings, with the average-rating search projection
/// - `reservation`: Guest bookings joined with their properties
///
/// Reviews are only read as an aggregate inside property search and have no
/// model of their own.

pub mod property;
pub mod reservation;
pub mod user;
