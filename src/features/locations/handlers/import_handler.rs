use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Form, FromRequest, Query, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::core::config::ImportConfig;
use crate::core::error::Result;
use crate::features::locations::dtos::ImportReportEnvelopeDto;
use crate::features::locations::services::{ImportOptions, ImportService};

/// Per-request overrides for the import defaults. Accepted both as query
/// params and in the request body (form or JSON); the query string wins when
/// a field appears in both. The boolean flags arrive as strings and are true
/// iff literally `"true"`, any other value is false.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ImportQuery {
    pub file_name: Option<String>,
    pub upload_dir: Option<String>,
    pub allow_blank: Option<String>,
    pub delete_all: Option<String>,
    pub max_lines: Option<u64>,
}

impl ImportQuery {
    /// Field-wise combination, `self` taking precedence
    pub fn or(self, fallback: ImportQuery) -> ImportQuery {
        ImportQuery {
            file_name: self.file_name.or(fallback.file_name),
            upload_dir: self.upload_dir.or(fallback.upload_dir),
            allow_blank: self.allow_blank.or(fallback.allow_blank),
            delete_all: self.delete_all.or(fallback.delete_all),
            max_lines: self.max_lines.or(fallback.max_lines),
        }
    }

    pub fn merge(&self, defaults: &ImportConfig) -> ImportOptions {
        let upload_dir = self.upload_dir.as_deref().unwrap_or(&defaults.upload_dir);
        let file_name = self.file_name.as_deref().unwrap_or(&defaults.file_name);

        ImportOptions {
            dumpfile: Path::new(upload_dir).join(file_name),
            allow_blank: self
                .allow_blank
                .as_deref()
                .map(|v| v == "true")
                .unwrap_or(defaults.allow_blank),
            delete_all: self
                .delete_all
                .as_deref()
                .map(|v| v == "true")
                .unwrap_or(defaults.delete_all),
            max_lines: self.max_lines.unwrap_or(defaults.max_lines),
        }
    }
}

/// Pull overrides out of a form or JSON request body. A missing, foreign or
/// malformed body contributes nothing rather than failing the request.
async fn body_overrides(request: Request) -> ImportQuery {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        match Form::<ImportQuery>::from_request(request, &()).await {
            Ok(Form(overrides)) => overrides,
            Err(e) => {
                tracing::debug!("Ignoring unparseable form body: {}", e);
                ImportQuery::default()
            }
        }
    } else if content_type.starts_with("application/json") {
        match Json::<ImportQuery>::from_request(request, &()).await {
            Ok(Json(overrides)) => overrides,
            Err(e) => {
                tracing::debug!("Ignoring unparseable JSON body: {}", e);
                ImportQuery::default()
            }
        }
    } else {
        ImportQuery::default()
    }
}

/// Import a CSV dump of location records
///
/// Rows failing validation are recorded in the report and do not abort the
/// run. When `delete_all` is in effect the table is cleared before the file
/// is opened, so a run against a missing file still clears the store.
#[utoipa::path(
    post,
    path = "/import_data",
    params(
        ("file_name" = Option<String>, Query, description = "CSV file name inside the upload directory"),
        ("upload_dir" = Option<String>, Query, description = "Directory the CSV is read from"),
        ("allow_blank" = Option<String>, Query, description = "\"true\" to tolerate blank rows (echoed in the report)"),
        ("delete_all" = Option<String>, Query, description = "\"true\" to clear the table before importing"),
        ("max_lines" = Option<u64>, Query, description = "Cap on data rows read, 0 = unlimited")
    ),
    request_body(
        content = ImportQuery,
        description = "Same overrides as the query params; the query string wins on conflict",
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Import report", body = ImportReportEnvelopeDto),
        (status = 422, description = "Source file cannot be opened", body = crate::shared::types::ErrorBody)
    ),
    tag = "import"
)]
pub async fn import_data(
    State(service): State<Arc<ImportService>>,
    Query(query): Query<ImportQuery>,
    request: Request,
) -> Result<Json<ImportReportEnvelopeDto>> {
    let overrides = query.or(body_overrides(request).await);
    let options = overrides.merge(service.defaults());
    tracing::info!(
        "Import requested: dumpfile={}, delete_all={}, max_lines={}",
        options.dumpfile.display(),
        options.delete_all,
        options.max_lines
    );

    let report = service.run(&options).await?;
    Ok(Json(ImportReportEnvelopeDto {
        import_data: report,
    }))
}
