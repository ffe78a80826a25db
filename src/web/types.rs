// src/web/types.rs
use crate::errors::ExportError;
use rocket::form::FromForm;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use tracing::{error, warn};

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ConvertRequest {
    #[serde(rename = "linkedinUrl")]
    pub linkedin_url: Option<String>,
    /// `async` (default) answers with the snapshot id right after the
    /// trigger; `sync` polls server-side and answers with the CSV.
    pub mode: Option<ConvertMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ConvertMode {
    Sync,
    Async,
}

#[derive(FromForm)]
pub struct CheckSnapshotParams {
    #[field(name = "snapshotId")]
    pub snapshot_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TriggeredResponse {
    #[serde(rename = "snapshotId")]
    pub snapshot_id: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RunningResponse {
    pub status: &'static str,
}

impl RunningResponse {
    pub fn new() -> Self {
        Self { status: "running" }
    }
}

impl Default for RunningResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
}

/// CSV download: `text/csv` with a timestamped attachment filename.
pub struct CsvResponse {
    pub content: String,
    pub filename: String,
}

impl CsvResponse {
    pub fn new(content: String) -> Self {
        Self {
            content,
            filename: format!("profile_{}.csv", chrono::Utc::now().timestamp_millis()),
        }
    }
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.content.len(), std::io::Cursor::new(self.content))
            .ok()
    }
}

/// JSON error body with the status the error taxonomy prescribes.
pub struct ApiError {
    pub status: Status,
    pub message: String,
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        let status = match err {
            ExportError::Validation(_) => Status::BadRequest,
            _ => Status::InternalServerError,
        };
        if status == Status::BadRequest {
            warn!("{}", err);
        } else {
            error!("Conversion failed: {}", err);
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Json(ErrorBody {
            error: self.message,
        })
        .respond_to(request)?;
        response.set_status(self.status);
        Ok(response)
    }
}

/// 405 with the `Allow` header naming the one accepted method.
pub struct MethodNotAllowed {
    pub allow: &'static str,
}

impl MethodNotAllowed {
    pub fn new(allow: &'static str) -> Self {
        Self { allow }
    }
}

impl<'r> Responder<'r, 'static> for MethodNotAllowed {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let body = format!("Method {} Not Allowed", request.method());
        Response::build()
            .status(Status::MethodNotAllowed)
            .header(ContentType::Plain)
            .raw_header("Allow", self.allow)
            .sized_body(body.len(), std::io::Cursor::new(body))
            .ok()
    }
}
