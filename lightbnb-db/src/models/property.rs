/// Property model and database operations
///
/// Properties are rental listings owned by a user. Prices are stored in minor
/// currency units (cents); search filters take major units and scale them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE properties (
///     id SERIAL PRIMARY KEY NOT NULL,
///     owner_id INTEGER REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     thumbnail_photo_url VARCHAR(255) NOT NULL,
///     cover_photo_url VARCHAR(255) NOT NULL,
///     cost_per_night INTEGER NOT NULL DEFAULT 0,
///     parking_spaces INTEGER NOT NULL DEFAULT 0,
///     number_of_bathrooms INTEGER NOT NULL DEFAULT 0,
///     number_of_bedrooms INTEGER NOT NULL DEFAULT 0,
///     country VARCHAR(255) NOT NULL,
///     street VARCHAR(255) NOT NULL,
///     city VARCHAR(255) NOT NULL,
///     province VARCHAR(255) NOT NULL,
///     post_code VARCHAR(255) NOT NULL,
///     active BOOLEAN NOT NULL DEFAULT TRUE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::query::PropertySearch;

/// A rental listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: i32,

    /// Owning user; the column is nullable in the schema
    pub owner_id: Option<i32>,

    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,

    /// Nightly price in minor currency units
    pub cost_per_night: i32,

    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,

    /// Whether the listing is live (defaults to true on insert)
    pub active: bool,
}

/// A property with the average of its review ratings
///
/// `average_rating` is `None` when the property has no reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyWithRating {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,

    pub average_rating: Option<f64>,
}

/// Input for creating a property
///
/// `cost_per_night` is already in minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

impl NewProperty {
    /// Column names, in the order `insert_query` binds the fields
    pub const COLUMNS: [&'static str; 14] = [
        "owner_id",
        "title",
        "description",
        "thumbnail_photo_url",
        "cover_photo_url",
        "cost_per_night",
        "parking_spaces",
        "number_of_bathrooms",
        "number_of_bedrooms",
        "country",
        "street",
        "city",
        "province",
        "post_code",
    ];

    /// Builds `INSERT INTO properties (...) VALUES ($1, ..., $14) RETURNING *`
    pub fn insert_query(self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("INSERT INTO properties (");
        builder.push(Self::COLUMNS.join(", "));
        builder.push(") VALUES (");

        let mut values = builder.separated(", ");
        values.push_bind(self.owner_id);
        values.push_bind(self.title);
        values.push_bind(self.description);
        values.push_bind(self.thumbnail_photo_url);
        values.push_bind(self.cover_photo_url);
        values.push_bind(self.cost_per_night);
        values.push_bind(self.parking_spaces);
        values.push_bind(self.number_of_bathrooms);
        values.push_bind(self.number_of_bedrooms);
        values.push_bind(self.country);
        values.push_bind(self.street);
        values.push_bind(self.city);
        values.push_bind(self.province);
        values.push_bind(self.post_code);
        values.push_unseparated(") RETURNING *");

        builder
    }
}

impl Property {
    /// Inserts a property and returns the stored row
    ///
    /// # Errors
    ///
    /// Returns a database error if `owner_id` does not reference a user, a
    /// required column is rejected, or the connection fails.
    pub async fn create(pool: &PgPool, data: NewProperty) -> Result<Self, sqlx::Error> {
        let mut builder = data.insert_query();

        let property = builder
            .build_query_as::<Property>()
            .fetch_one(pool)
            .await?;

        Ok(property)
    }

    /// Searches properties with optional filters
    ///
    /// Results are ordered by ascending `cost_per_night` and capped at `limit`.
    pub async fn search(
        pool: &PgPool,
        search: &PropertySearch,
        limit: i64,
    ) -> Result<Vec<PropertyWithRating>, sqlx::Error> {
        let mut builder = search.build(limit);
        debug!(
            sql = builder.sql(),
            unfiltered = search.is_unfiltered(),
            "Running property search"
        );

        let properties = builder
            .build_query_as::<PropertyWithRating>()
            .fetch_all(pool)
            .await?;

        Ok(properties)
    }
}
