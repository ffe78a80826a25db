// src/snapshot/client.rs
use crate::config::ExporterConfig;
use crate::errors::ExportError;
use crate::snapshot::poller::{poll_until_ready, PollOptions};
use crate::types::ProfileRecord;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};

/// Client for the remote extraction service: one call to start a snapshot
/// job, one call to read its status or result.
pub struct SnapshotClient {
    client: Client,
    trigger_url: String,
    snapshot_url: String,
    dataset_id: String,
    api_token: String,
}

impl SnapshotClient {
    pub fn new(config: &ExporterConfig) -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            trigger_url: config.trigger_url.clone(),
            snapshot_url: config.snapshot_url.clone(),
            dataset_id: config.dataset_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Start an extraction job for a single profile URL and return the
    /// snapshot id the service assigned to it.
    pub async fn trigger(&self, linkedin_url: &str) -> Result<String, ExportError> {
        let url = format!(
            "{}?dataset_id={}&include_errors=true",
            self.trigger_url, self.dataset_id
        );
        info!("Triggering extraction job for {}", linkedin_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&json!([{ "url": linkedin_url }]))
            .send()
            .await?;
        let response = Self::require_success(response).await?;

        let payload: Value = response.json().await?;
        debug!("Trigger response: {}", payload);

        match payload.get("snapshot_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {
                info!("Snapshot triggered: {}", id);
                Ok(id.to_string())
            }
            _ => Err(ExportError::NoSnapshotId),
        }
    }

    /// Fetch the current snapshot payload: either `{"status": "running"}`
    /// or the terminal result.
    pub async fn fetch_snapshot(&self, snapshot_id: &str) -> Result<Value, ExportError> {
        let url = format!("{}/{}", self.snapshot_url, snapshot_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await?;
        let response = Self::require_success(response).await?;

        let payload: Value = response.json().await?;
        debug!("Polling snapshot response: {}", payload);
        Ok(payload)
    }

    /// Poll the snapshot until it is ready and decode the profile record.
    pub async fn await_profile(
        &self,
        snapshot_id: &str,
        opts: &PollOptions,
    ) -> Result<ProfileRecord, ExportError> {
        let payload = poll_until_ready(|| self.fetch_snapshot(snapshot_id), opts).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Full pipeline for one URL: trigger, then poll to completion.
    pub async fn export(
        &self,
        linkedin_url: &str,
        opts: &PollOptions,
    ) -> Result<ProfileRecord, ExportError> {
        let snapshot_id = self.trigger(linkedin_url).await?;
        self.await_profile(&snapshot_id, opts).await
    }

    async fn require_success(response: reqwest::Response) -> Result<reqwest::Response, ExportError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("Upstream error {}: {}", status, body);
        Err(ExportError::Upstream { status, body })
    }
}
