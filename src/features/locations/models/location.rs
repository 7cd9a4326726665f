use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::features::locations::dtos::LocationResponseDto;

/// Database model for a geolocation record
#[derive(Debug, Clone, FromRow)]
pub struct Location {
    pub id: i64,
    pub ip_address: String,
    pub country_code: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub mystery_value: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Location> for LocationResponseDto {
    fn from(l: Location) -> Self {
        Self {
            id: l.id,
            ip_address: l.ip_address,
            country_code: l.country_code,
            country: l.country,
            city: l.city,
            latitude: l.latitude,
            longitude: l.longitude,
            mystery_value: l.mystery_value,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}
