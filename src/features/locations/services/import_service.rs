//! CSV bulk import with partial-failure bookkeeping.
//!
//! The run is deliberately not transactional: each row is an independent unit
//! of work, and when `delete_all` is set the table is cleared before the
//! source file is even opened. A run against a missing file therefore leaves
//! the store empty. This mirrors the delete-then-stream-insert behavior of
//! the data dumps this service was built around.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use csv::StringRecord;
use sqlx::SqlitePool;

use crate::core::config::ImportConfig;
use crate::core::error::{AppError, Result};
use crate::features::locations::dtos::{
    ImportReportDto, ImportRowErrorDto, ImportSettingsDto, RecordCountsDto, StopwatchDto,
};
use crate::features::locations::services::LocationService;
use crate::features::locations::validator::{
    FieldViolations, LocationCandidate, MSG_NOT_A_NUMBER,
};

/// Options for one import run: process-wide defaults with any per-request
/// overrides already merged in.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub dumpfile: PathBuf,
    pub allow_blank: bool,
    pub delete_all: bool,
    pub max_lines: u64,
}

/// Service driving CSV parsing, per-row validation and statistics
pub struct ImportService {
    locations: Arc<LocationService>,
    defaults: ImportConfig,
}

impl ImportService {
    pub fn new(pool: SqlitePool, defaults: ImportConfig) -> Self {
        Self {
            locations: Arc::new(LocationService::new(pool)),
            defaults,
        }
    }

    pub fn defaults(&self) -> &ImportConfig {
        &self.defaults
    }

    /// Run a full import. Per-row validation failures are recorded in the
    /// report and never abort the run; only an unopenable source file (or a
    /// store failure) is fatal.
    pub async fn run(&self, options: &ImportOptions) -> Result<ImportReportDto> {
        let started_at = Utc::now();
        let stopwatch = Instant::now();

        if options.delete_all {
            let removed = self.locations.delete_all().await?;
            tracing::info!("Cleared {} existing locations before import", removed);
        }

        // The clear above has already happened when this fails; accepted
        // partial-failure characteristic of the run.
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&options.dumpfile)
            .map_err(|e| {
                tracing::warn!("Cannot open {}: {}", options.dumpfile.display(), e);
                AppError::FileAccess(options.dumpfile.display().to_string())
            })?;

        let columns = header_positions(reader.headers().map_err(|e| {
            tracing::warn!("Cannot read CSV header: {}", e);
            AppError::FileAccess(options.dumpfile.display().to_string())
        })?);

        let mut line: u64 = 0;
        let mut nok: u64 = 0;
        let mut errors: Vec<ImportRowErrorDto> = Vec::new();

        for record in reader.records() {
            if options.max_lines > 0 && line >= options.max_lines {
                break;
            }
            line += 1;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    nok += 1;
                    let mut violations = FieldViolations::default();
                    violations.add("row", "is not parseable");
                    tracing::debug!("Row {} unparseable: {}", line, e);
                    errors.push(ImportRowErrorDto {
                        line,
                        values: String::new(),
                        messages: violations,
                    });
                    continue;
                }
            };

            let (candidate, parse_violations) = candidate_from_record(&columns, &record);
            let mut violations = self.locations.validate(&candidate).await?;
            violations.merge(parse_violations);

            if violations.is_empty() {
                self.locations.insert(candidate).await?;
            } else {
                nok += 1;
                errors.push(ImportRowErrorDto {
                    line,
                    values: record.iter().collect::<Vec<_>>().join(","),
                    messages: violations,
                });
            }
        }

        let finished_at = Utc::now();
        let elapsed = stopwatch.elapsed();
        tracing::info!(
            "Import finished: total={}, ok={}, nok={}, elapsed={:.3}s",
            line,
            line - nok,
            nok,
            elapsed.as_secs_f64()
        );

        Ok(ImportReportDto {
            dumpfile: options.dumpfile.display().to_string(),
            settings: ImportSettingsDto {
                allow_blank: options.allow_blank,
                delete_all: options.delete_all,
                max_lines: options.max_lines,
            },
            records: RecordCountsDto {
                total: line,
                ok: line - nok,
                nok,
                errors,
            },
            stopwatch: StopwatchDto {
                started: started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                finished: finished_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                elapsed: format!("{:.3}s", elapsed.as_secs_f64()),
            },
        })
    }
}

/// Map each known column name to its position in the header row
fn header_positions(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect()
}

fn cell<'r>(
    columns: &HashMap<String, usize>,
    record: &'r StringRecord,
    field: &str,
) -> Option<&'r str> {
    columns
        .get(field)
        .and_then(|&idx| record.get(idx))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Build a candidate from one CSV row. Cells that should be numeric but do
/// not parse become violations on their field instead of silently turning
/// into NULLs.
fn candidate_from_record(
    columns: &HashMap<String, usize>,
    record: &StringRecord,
) -> (LocationCandidate, FieldViolations) {
    let mut violations = FieldViolations::default();

    let mut float_cell = |field: &str| -> Option<f64> {
        cell(columns, record, field).and_then(|raw| match raw.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                violations.add(field, MSG_NOT_A_NUMBER);
                None
            }
        })
    };
    let latitude = float_cell("latitude");
    let longitude = float_cell("longitude");

    let mystery_value =
        cell(columns, record, "mystery_value").and_then(|raw| match raw.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                violations.add("mystery_value", MSG_NOT_A_NUMBER);
                None
            }
        });

    let candidate = LocationCandidate {
        ip_address: cell(columns, record, "ip_address").map(str::to_string),
        country_code: cell(columns, record, "country_code").map(str::to_string),
        country: cell(columns, record, "country").map(str::to_string),
        city: cell(columns, record, "city").map(str::to_string),
        latitude,
        longitude,
        mystery_value,
    };

    (candidate, violations)
}
