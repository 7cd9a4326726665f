use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::locations::validator::FieldViolations;

/// Top-level envelope for the import endpoint: `{"import_data": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportReportEnvelopeDto {
    pub import_data: ImportReportDto,
}

/// Structured summary of one import run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportReportDto {
    /// Resolved path of the CSV source
    pub dumpfile: String,
    pub settings: ImportSettingsDto,
    pub records: RecordCountsDto,
    pub stopwatch: StopwatchDto,
}

/// Echo of the options the run was executed with
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportSettingsDto {
    pub allow_blank: bool,
    pub delete_all: bool,
    pub max_lines: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordCountsDto {
    /// Data rows processed (1-based, header excluded)
    pub total: u64,
    pub ok: u64,
    pub nok: u64,
    pub errors: Vec<ImportRowErrorDto>,
}

/// One rejected CSV row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportRowErrorDto {
    /// 1-based data row number
    pub line: u64,
    /// Raw cell values joined by comma
    pub values: String,
    pub messages: FieldViolations,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StopwatchDto {
    pub started: String,
    pub finished: String,
    pub elapsed: String,
}
