pub mod import_dto;
pub mod location_dto;

pub use import_dto::{
    ImportReportDto, ImportReportEnvelopeDto, ImportRowErrorDto, ImportSettingsDto,
    RecordCountsDto, StopwatchDto,
};
pub use location_dto::{IpLookupResponseDto, LocationResponseDto};
