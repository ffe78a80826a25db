// src/web/handlers.rs
use crate::errors::ExportError;
use crate::flatten::flatten;
use crate::snapshot::poller::{classify_payload, PollOptions, SnapshotState};
use crate::snapshot::SnapshotClient;
use crate::types::ProfileRecord;
use crate::web::types::{
    ApiError, CheckSnapshotParams, ConvertMode, ConvertRequest, CsvResponse, MethodNotAllowed,
    RunningResponse, TriggeredResponse,
};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, Responder, State};
use tracing::info;

#[derive(Responder)]
pub enum ConvertOutcome {
    Csv(CsvResponse),
    Triggered(Json<TriggeredResponse>),
}

#[derive(Responder)]
pub enum SnapshotOutcome {
    Running(Json<RunningResponse>),
    Csv(CsvResponse),
}

#[post("/convert", data = "<request>")]
pub async fn convert(
    request: Option<Json<ConvertRequest>>,
    client: &State<SnapshotClient>,
) -> Result<ConvertOutcome, ApiError> {
    let request = request.ok_or_else(|| {
        ApiError::from(ExportError::Validation(
            "Missing linkedinUrl in request body".to_string(),
        ))
    })?;

    let linkedin_url = match request.linkedin_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            return Err(ExportError::Validation(
                "Missing linkedinUrl in request body".to_string(),
            )
            .into())
        }
    };

    let snapshot_id = client.trigger(&linkedin_url).await?;

    match request.mode.unwrap_or(ConvertMode::Async) {
        ConvertMode::Async => Ok(ConvertOutcome::Triggered(Json(TriggeredResponse {
            snapshot_id,
        }))),
        ConvertMode::Sync => {
            let record = client
                .await_profile(&snapshot_id, &PollOptions::default())
                .await?;
            info!("Profile ready, flattening to CSV for {}", linkedin_url);
            Ok(ConvertOutcome::Csv(CsvResponse::new(
                flatten(&record).to_csv(),
            )))
        }
    }
}

#[get("/checkSnapshot?<params..>")]
pub async fn check_snapshot(
    params: CheckSnapshotParams,
    client: &State<SnapshotClient>,
) -> Result<SnapshotOutcome, ApiError> {
    let snapshot_id = match params.snapshot_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            return Err(ExportError::Validation(
                "Missing snapshotId in query params".to_string(),
            )
            .into())
        }
    };

    let payload = client.fetch_snapshot(&snapshot_id).await?;
    match classify_payload(payload) {
        SnapshotState::Running => Ok(SnapshotOutcome::Running(Json(RunningResponse::new()))),
        SnapshotState::Failed(message) => Err(ExportError::SnapshotFailed(message).into()),
        SnapshotState::Ready(value) => {
            let record: ProfileRecord =
                serde_json::from_value(value).map_err(ExportError::from)?;
            info!("Snapshot {} ready, returning CSV", snapshot_id);
            Ok(SnapshotOutcome::Csv(CsvResponse::new(
                flatten(&record).to_csv(),
            )))
        }
    }
}

// Wrong-method fallbacks keep the contract explicit: 405 plus an Allow
// header instead of rocket's default 404.
#[get("/convert", rank = 2)]
pub async fn convert_method_not_allowed() -> MethodNotAllowed {
    MethodNotAllowed::new("POST")
}

#[post("/checkSnapshot", rank = 2)]
pub async fn check_snapshot_method_not_allowed() -> MethodNotAllowed {
    MethodNotAllowed::new("GET")
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    Json("OK")
}

// CORS preflight for the static front-end.
#[rocket::options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}
