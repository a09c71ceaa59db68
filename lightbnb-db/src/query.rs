/// Parameterized query construction
///
/// Builds the property-search statement from a set of optional filters on a
/// `sqlx::QueryBuilder`. The SQL text is assembled only from static fragments;
/// every caller-supplied value goes through `push_bind` and reaches the server
/// as a `$n` parameter.
///
/// WHERE predicates are collected in order and joined with `AND`, with a
/// single `WHERE` prepended when at least one is present. The rating filter
/// constrains an aggregate and is emitted as `HAVING` after `GROUP BY`.
///
/// # Example
///
/// ```
/// use lightbnb_db::query::PropertySearch;
///
/// let search = PropertySearch {
///     city: Some("Vancouver".to_string()),
///     minimum_price_per_night: Some(100),
///     ..Default::default()
/// };
///
/// let builder = search.build(10);
/// assert!(builder
///     .sql()
///     .contains("WHERE properties.city LIKE $1 AND properties.cost_per_night >= $2"));
/// assert!(builder.sql().ends_with("LIMIT $3"));
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

/// Number of rows returned when the caller does not pick a limit
pub const DEFAULT_LIMIT: i64 = 10;

/// Minor currency units per major unit
pub const CENTS_PER_UNIT: i64 = 100;

const SEARCH_SELECT: &str =
    "SELECT properties.*, avg(property_reviews.rating)::float8 AS average_rating\n\
     FROM properties\n\
     LEFT JOIN property_reviews ON properties.id = property_reviews.property_id";

/// Optional filters for property search
///
/// Field names match the keys a search form submits. A filter applies only
/// when it is present and non-zero (or non-empty for `city`). A `NaN` rating
/// counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySearch {
    /// Exact owner match
    pub owner_id: Option<i32>,

    /// Case-sensitive substring of the property's city
    pub city: Option<String>,

    /// Lower price bound in major currency units
    pub minimum_price_per_night: Option<i32>,

    /// Upper price bound in major currency units
    pub maximum_price_per_night: Option<i32>,

    /// Lower bound on the average review rating
    pub minimum_rating: Option<f64>,
}

impl PropertySearch {
    /// Builds the search statement, capped at `limit` rows
    pub fn build(&self, limit: i64) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(SEARCH_SELECT);

        if self.has_row_filters() {
            builder.push("\nWHERE ");
            let mut predicates = builder.separated(" AND ");

            if let Some(owner_id) = self.owner_filter() {
                predicates.push("properties.owner_id = ");
                predicates.push_bind_unseparated(owner_id);
            }
            if let Some(pattern) = self.city_pattern() {
                predicates.push("properties.city LIKE ");
                predicates.push_bind_unseparated(pattern);
            }
            if let Some(min) = self.minimum_cost() {
                predicates.push("properties.cost_per_night >= ");
                predicates.push_bind_unseparated(min);
            }
            if let Some(max) = self.maximum_cost() {
                predicates.push("properties.cost_per_night <= ");
                predicates.push_bind_unseparated(max);
            }
        }

        builder.push("\nGROUP BY properties.id");

        if let Some(rating) = self.rating_filter() {
            builder.push("\nHAVING avg(property_reviews.rating) >= ");
            builder.push_bind(rating);
        }

        builder.push("\nORDER BY properties.cost_per_night ASC, properties.id ASC\nLIMIT ");
        builder.push_bind(limit);

        builder
    }

    /// True if no filter applies
    pub fn is_unfiltered(&self) -> bool {
        !self.has_row_filters() && self.rating_filter().is_none()
    }

    fn has_row_filters(&self) -> bool {
        self.owner_filter().is_some()
            || self.city_pattern().is_some()
            || self.minimum_cost().is_some()
            || self.maximum_cost().is_some()
    }

    fn owner_filter(&self) -> Option<i32> {
        self.owner_id.filter(|v| *v != 0)
    }

    /// `%city%` with LIKE metacharacters escaped
    fn city_pattern(&self) -> Option<String> {
        self.city
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| format!("%{}%", escape_like(c)))
    }

    fn minimum_cost(&self) -> Option<i64> {
        self.minimum_price_per_night
            .filter(|v| *v != 0)
            .map(to_minor_units)
    }

    fn maximum_cost(&self) -> Option<i64> {
        self.maximum_price_per_night
            .filter(|v| *v != 0)
            .map(to_minor_units)
    }

    fn rating_filter(&self) -> Option<f64> {
        self.minimum_rating.filter(|v| *v != 0.0 && !v.is_nan())
    }
}

/// Converts a major-unit price to minor units
///
/// Widened to `i64` so every `i32` input scales exactly.
pub fn to_minor_units(major: i32) -> i64 {
    i64::from(major) * CENTS_PER_UNIT
}

/// Escapes LIKE metacharacters so the value matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
