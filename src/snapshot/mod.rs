// src/snapshot/mod.rs
pub mod client;
pub mod poller;

pub use client::SnapshotClient;
pub use poller::{classify_payload, poll_until_ready, PollOptions, SnapshotState};
