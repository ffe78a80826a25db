// src/snapshot/poller.rs
//! Sequential poll-until-ready loop over the snapshot status endpoint.
//!
//! The loop is generic over an async fetch closure so the state machine can
//! be driven by scripted payload sequences in tests. Attempts are strictly
//! sequential; the only retried condition is a `running` status, with a
//! fixed delay between checks. Transport failures propagate immediately.

use crate::errors::ExportError;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PollOptions {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(15),
        }
    }
}

/// What one status payload means for the polling loop.
#[derive(Debug)]
pub enum SnapshotState {
    Running,
    Failed(String),
    Ready(Value),
}

/// Classify a snapshot payload. A one-element array is unwrapped first: the
/// job is triggered as a one-URL batch and some dataset versions deliver the
/// result as that batch. A `running` status polls on; an explicit failure
/// status or a top-level error field is a terminal upstream failure and is
/// never forwarded as profile data; anything else is the ready payload.
pub fn classify_payload(payload: Value) -> SnapshotState {
    let payload = match payload {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return SnapshotState::Failed("snapshot returned no records".to_string()),
        },
        other => other,
    };

    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if status.eq_ignore_ascii_case("running") {
        return SnapshotState::Running;
    }
    if status.eq_ignore_ascii_case("failed") || status.eq_ignore_ascii_case("error") {
        return SnapshotState::Failed(failure_message(&payload));
    }
    let has_error_field = ["error", "error_code"]
        .iter()
        .any(|key| payload.get(key).is_some_and(|v| !v.is_null()));
    if has_error_field {
        return SnapshotState::Failed(failure_message(&payload));
    }

    SnapshotState::Ready(payload)
}

fn failure_message(payload: &Value) -> String {
    for key in ["error", "message", "error_code", "status"] {
        if let Some(text) = payload.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    "snapshot reported a failure without details".to_string()
}

/// Poll until the snapshot leaves the `running` state, or fail with
/// `PollTimeout` after `max_attempts` consecutive running observations.
/// The wait between attempts is a cooperative `tokio::time::sleep`, so
/// unrelated requests on the same runtime are never stalled.
pub async fn poll_until_ready<F, Fut>(mut fetch: F, opts: &PollOptions) -> Result<Value, ExportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Value, ExportError>>,
{
    for attempt in 1..=opts.max_attempts {
        let payload = fetch().await?;
        match classify_payload(payload) {
            SnapshotState::Ready(value) => {
                info!("Snapshot ready after {} attempt(s)", attempt);
                return Ok(value);
            }
            SnapshotState::Failed(message) => {
                warn!("Snapshot reported a failure: {}", message);
                return Err(ExportError::SnapshotFailed(message));
            }
            SnapshotState::Running => {
                info!(
                    "Snapshot not ready yet (attempt {}/{}). Retrying in {} seconds...",
                    attempt,
                    opts.max_attempts,
                    opts.delay.as_secs()
                );
                if attempt < opts.max_attempts {
                    sleep(opts.delay).await;
                }
            }
        }
    }

    Err(ExportError::PollTimeout {
        attempts: opts.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    fn running() -> Result<Value, ExportError> {
        Ok(json!({ "status": "running" }))
    }

    fn scripted(
        responses: Vec<Result<Value, ExportError>>,
    ) -> (
        RefCell<VecDeque<Result<Value, ExportError>>>,
        Cell<u32>,
    ) {
        (RefCell::new(VecDeque::from(responses)), Cell::new(0))
    }

    fn zero_delay(max_attempts: u32) -> PollOptions {
        PollOptions {
            max_attempts,
            delay: Duration::from_millis(0),
        }
    }

    #[tokio::test]
    async fn test_nine_running_then_terminal_returns_payload() {
        let mut responses: Vec<_> = (0..9).map(|_| running()).collect();
        responses.push(Ok(json!({ "name": "Ada Lovelace" })));
        let (queue, calls) = scripted(responses);

        let fetch = || {
            calls.set(calls.get() + 1);
            let next = queue.borrow_mut().pop_front().expect("unexpected extra poll");
            async move { next }
        };

        let value = poll_until_ready(fetch, &zero_delay(10))
            .await
            .expect("terminal payload");
        assert_eq!(calls.get(), 10);
        assert_eq!(value["name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_ten_running_times_out_without_eleventh_check() {
        let (queue, calls) = scripted((0..10).map(|_| running()).collect());

        let fetch = || {
            calls.set(calls.get() + 1);
            let next = queue.borrow_mut().pop_front().expect("unexpected extra poll");
            async move { next }
        };

        let err = poll_until_ready(fetch, &zero_delay(10))
            .await
            .expect_err("should time out");
        assert_eq!(calls.get(), 10);
        assert!(matches!(err, ExportError::PollTimeout { attempts: 10 }));
    }

    #[tokio::test]
    async fn test_failed_status_is_an_error_not_data() {
        let (queue, calls) = scripted(vec![
            running(),
            Ok(json!({ "status": "failed", "error": "profile is private" })),
        ]);

        let fetch = || {
            calls.set(calls.get() + 1);
            let next = queue.borrow_mut().pop_front().expect("unexpected extra poll");
            async move { next }
        };

        let err = poll_until_ready(fetch, &zero_delay(10))
            .await
            .expect_err("failed snapshot");
        assert_eq!(calls.get(), 2);
        match err {
            ExportError::SnapshotFailed(message) => assert_eq!(message, "profile is private"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_retry() {
        let (queue, calls) = scripted(vec![Err(ExportError::NoSnapshotId)]);

        let fetch = || {
            calls.set(calls.get() + 1);
            let next = queue.borrow_mut().pop_front().expect("unexpected extra poll");
            async move { next }
        };

        let err = poll_until_ready(fetch, &zero_delay(10))
            .await
            .expect_err("fetch error");
        assert_eq!(calls.get(), 1);
        assert!(matches!(err, ExportError::NoSnapshotId));
    }

    #[test]
    fn test_classify_unwraps_single_element_arrays() {
        let state = classify_payload(json!([{ "name": "Ada" }]));
        match state {
            SnapshotState::Ready(value) => assert_eq!(value["name"], "Ada"),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn test_classify_empty_array_is_failure() {
        assert!(matches!(
            classify_payload(json!([])),
            SnapshotState::Failed(_)
        ));
    }

    #[test]
    fn test_classify_error_field_without_status() {
        let state = classify_payload(json!({ "error": "blocked", "error_code": "crawl_failed" }));
        match state {
            SnapshotState::Failed(message) => assert_eq!(message, "blocked"),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn test_classify_plain_profile_is_ready() {
        assert!(matches!(
            classify_payload(json!({ "name": "Ada", "city": "London" })),
            SnapshotState::Ready(_)
        ));
    }
}
