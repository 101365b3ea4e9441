//! Async client for the Splox workflow API.
//!
//! The centre of the crate is the listen stream: [`EventStream`] turns a
//! `text/event-stream` response into typed [`StreamEvent`]s, and
//! [`wait::run_and_wait`] uses it to trigger a workflow and block until the
//! execution reaches a terminal status.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use splox_client::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), SploxError> {
//! let client = Client::from_env()?;
//!
//! let params = RunParams::new("version-id", "chat-id", "start-node-id", "Summarize the report");
//! let tree = client
//!     .workflows()
//!     .run_and_wait(&params, Duration::from_secs(300))
//!     .await?;
//!
//! for node in tree.execution_tree.walk_nodes() {
//!     println!("{} {}", node.node_label.as_deref().unwrap_or(&node.node_id), node.status);
//! }
//! # Ok(())
//! # }
//! ```

/// Client entry point and service accessors.
pub mod client;
/// Connection settings and environment loading.
pub mod config;
/// Public error types.
pub mod errors;
/// Request and response types.
pub mod models;
/// Opt-in `tracing` subscriber setup.
pub mod observability;
/// Common imports for typical usage.
pub mod prelude;
/// Typed service handles.
pub mod services;
/// Listen-stream parsing and the pull cursor.
pub mod stream;
pub(crate) mod transport;
/// Deadlines and the run-and-wait workflow.
pub mod wait;

pub use client::Client;
pub use config::ClientConfig;
pub use errors::{ApiError, SploxError};
pub use services::{Billing, Chats, Events, Memory, Workflows};
pub use stream::{ChatEventKind, EventFields, EventPayload, EventStream, StreamEvent};
pub use wait::{ExecutionBackend, WaitScope, run_and_wait};
