use utoipa::OpenApi;

use crate::features::locations::dtos as locations_dtos;
use crate::features::locations::handlers::{import_handler, location_handler};
use crate::features::locations::validator::FieldViolations;
use crate::shared::types::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Locations
        location_handler::list_locations,
        location_handler::get_location,
        location_handler::get_by_ip_address,
        // Import
        import_handler::import_data,
    ),
    components(
        schemas(
            ErrorBody,
            FieldViolations,
            import_handler::ImportQuery,
            locations_dtos::LocationResponseDto,
            locations_dtos::IpLookupResponseDto,
            locations_dtos::ImportReportEnvelopeDto,
            locations_dtos::ImportReportDto,
            locations_dtos::ImportSettingsDto,
            locations_dtos::RecordCountsDto,
            locations_dtos::ImportRowErrorDto,
            locations_dtos::StopwatchDto,
        )
    ),
    tags(
        (name = "locations", description = "Geolocation record listing and lookup"),
        (name = "import", description = "CSV bulk import"),
    ),
    info(
        title = "Geolocation API",
        version = "0.1.0",
        description = "IP-geolocation records with CSV bulk import",
    )
)]
pub struct ApiDoc;
