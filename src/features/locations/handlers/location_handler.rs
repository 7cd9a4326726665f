use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::locations::dtos::{IpLookupResponseDto, LocationResponseDto};
use crate::features::locations::services::LocationService;

/// List all stored locations
#[utoipa::path(
    get,
    path = "/locations",
    responses(
        (status = 200, description = "All stored locations", body = Vec<LocationResponseDto>),
    ),
    tag = "locations"
)]
pub async fn list_locations(
    State(service): State<Arc<LocationService>>,
) -> Result<Json<Vec<LocationResponseDto>>> {
    let locations = service.list().await?;
    Ok(Json(locations.into_iter().map(|l| l.into()).collect()))
}

/// Get a location by id
#[utoipa::path(
    get,
    path = "/locations/{id}",
    params(
        ("id" = i64, Path, description = "Location id")
    ),
    responses(
        (status = 200, description = "Location found", body = LocationResponseDto),
        (status = 404, description = "No location with this id", body = crate::shared::types::ErrorBody)
    ),
    tag = "locations"
)]
pub async fn get_location(
    State(service): State<Arc<LocationService>>,
    Path(id): Path<i64>,
) -> Result<Json<LocationResponseDto>> {
    let location = service.get(id).await?;
    Ok(Json(location.into()))
}

/// Look up a location by IP address
///
/// The address is checked for syntactic validity (v4 or v6) before the store
/// is queried.
#[utoipa::path(
    get,
    path = "/ip_address/{ip_address}",
    params(
        ("ip_address" = String, Path, description = "IPv4 or IPv6 address")
    ),
    responses(
        (status = 200, description = "Matching location", body = IpLookupResponseDto),
        (status = 404, description = "No location with this address", body = crate::shared::types::ErrorBody),
        (status = 422, description = "Not a syntactically valid IP address", body = crate::shared::types::ErrorBody)
    ),
    tag = "locations"
)]
pub async fn get_by_ip_address(
    State(service): State<Arc<LocationService>>,
    Path(ip_address): Path<String>,
) -> Result<Json<IpLookupResponseDto>> {
    let location = service.get_by_ip(&ip_address).await?;
    Ok(Json(IpLookupResponseDto {
        location: location.into(),
    }))
}
