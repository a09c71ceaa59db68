/// Reservation model and database operations
///
/// Reservations link a guest to a property for a date range. This crate only
/// reads them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reservations (
///     id SERIAL PRIMARY KEY NOT NULL,
///     start_date DATE NOT NULL,
///     end_date DATE NOT NULL,
///     property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
///     guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// );
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::property::Property;

/// A reservation joined with the property it books
///
/// The reservation's own id is `reservation_id`; `property.id` is the
/// property's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReservationWithProperty {
    pub reservation_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guest_id: i32,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
}

impl ReservationWithProperty {
    /// Number of nights booked
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Lists up to `limit` reservations for a guest with their properties
    ///
    /// Ordered by start date, earliest first; ties break on reservation id.
    pub async fn list_for_guest(
        pool: &PgPool,
        guest_id: i32,
        limit: i64,
    ) -> Result<Vec<ReservationWithProperty>, sqlx::Error> {
        let reservations = sqlx::query_as::<_, ReservationWithProperty>(
            r#"
            SELECT reservations.id AS reservation_id,
                   reservations.start_date,
                   reservations.end_date,
                   reservations.guest_id,
                   properties.*
            FROM reservations
            JOIN properties ON properties.id = reservations.property_id
            WHERE reservations.guest_id = $1
            ORDER BY reservations.start_date ASC, reservations.id ASC
            LIMIT $2
            "#,
        )
        .bind(guest_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(reservations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nights() {
        let row = ReservationWithProperty {
            reservation_id: 9,
            start_date: NaiveDate::from_ymd_opt(2018, 9, 11).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2018, 9, 26).unwrap(),
            guest_id: 1,
            property: Property {
                id: 1,
                owner_id: Some(2),
                title: "Blank corner".to_string(),
                description: None,
                thumbnail_photo_url: "t".to_string(),
                cover_photo_url: "c".to_string(),
                cost_per_night: 85_234,
                parking_spaces: 6,
                number_of_bathrooms: 6,
                number_of_bedrooms: 7,
                country: "Canada".to_string(),
                street: "651 Nami Road".to_string(),
                city: "Bohbatev".to_string(),
                province: "Alberta".to_string(),
                post_code: "83680".to_string(),
                active: true,
            },
        };

        assert_eq!(row.nights(), 15);

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["reservation_id"], 9);
        assert_eq!(value["id"], 1);
        assert_eq!(value["start_date"], "2018-09-11");
    }
}
