use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response DTO for a location record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationResponseDto {
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

/// Envelope for the lookup-by-IP endpoint: `{"location": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IpLookupResponseDto {
    pub location: LocationResponseDto,
}
