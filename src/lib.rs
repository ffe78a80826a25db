//! LinkedIn profile to CSV exporter.
//!
//! Triggers a remote extraction job for one profile URL, polls the snapshot
//! until it is ready, and flattens the nested profile JSON into a fixed
//! 104-column CSV row served over HTTP or written to disk.

pub mod config;
pub mod errors;
pub mod flatten;
pub mod snapshot;
pub mod types;
pub mod web;

pub use config::ExporterConfig;
pub use errors::ExportError;
pub use flatten::{flatten, CsvRow};
pub use snapshot::{PollOptions, SnapshotClient};
pub use types::ProfileRecord;
pub use web::start_web_server;
