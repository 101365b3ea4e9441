//! Run-and-wait orchestration.
//!
//! [`run_and_wait`] triggers an execution, listens for a terminal status on
//! its event stream within a [`WaitScope`], and then fetches the execution
//! tree as the authoritative result.
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::errors::SploxError;
use crate::models::{ExecutionStatus, ExecutionTreeResponse, RunParams, RunResponse};
use crate::stream::EventStream;

/// Optional deadline bounding a wait.
///
/// The scope owns its own expiry state, so callers can tell "deadline passed"
/// apart from "stream ended" after a read stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaitScope {
    deadline: Option<Instant>,
    timeout: Option<Duration>,
}

impl WaitScope {
    /// No deadline; waits until the stream ends or the future is dropped.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            timeout: Some(timeout),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The duration this scope was created with.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Runs `fut` until it completes or the deadline passes (`None`).
    pub async fn bound<F: Future>(&self, fut: F) -> Option<F::Output> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut).await.ok(),
            None => Some(fut.await),
        }
    }
}

/// The three remote calls `run_and_wait` is built from.
#[async_trait::async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Starts an execution and returns its request id.
    async fn trigger(&self, params: &RunParams) -> Result<RunResponse, SploxError>;

    /// Opens the listen stream for a request, bounded by `scope`.
    async fn open_listen(
        &self,
        workflow_request_id: &str,
        scope: WaitScope,
    ) -> Result<EventStream, SploxError>;

    /// Fetches the full execution hierarchy for a request.
    async fn fetch_tree(&self, workflow_request_id: &str)
    -> Result<ExecutionTreeResponse, SploxError>;
}

enum WaitOutcome {
    Terminal(ExecutionStatus),
    StreamEnded,
}

/// Triggers an execution and blocks until it reaches a terminal status.
///
/// - Trigger failure is returned immediately.
/// - A terminal status on the stream ends the wait; the tree is then fetched.
/// - If the wait deadline passes first, [`SploxError::Timeout`] is returned
///   and the tree is not fetched.
/// - A stream read failure is returned as-is.
/// - If the stream closes without a terminal status, the tree is fetched
///   anyway and returned whatever its status.
///
/// A `failed` or `stopped` execution is a successful return. The timeout
/// bounds only the wait; the trigger and tree fetch use the client's request
/// timeout. Nothing is retried.
pub async fn run_and_wait<B>(
    backend: &B,
    params: &RunParams,
    timeout: Duration,
) -> Result<ExecutionTreeResponse, SploxError>
where
    B: ExecutionBackend + ?Sized,
{
    let run = backend.trigger(params).await?;
    let request_id = run.workflow_request_id;
    debug!(request_id = %request_id, timeout_ms = timeout.as_millis() as u64, "workflow triggered, waiting for terminal status");

    let scope = WaitScope::with_timeout(timeout);
    let mut stream = match scope.bound(backend.open_listen(&request_id, scope)).await {
        Some(opened) => opened?,
        None => {
            warn!(request_id = %request_id, "wait deadline passed while opening event stream");
            return Err(SploxError::Timeout { timeout });
        }
    };

    let outcome = wait_for_terminal(&mut stream).await;
    stream.close();

    match outcome {
        WaitOutcome::Terminal(status) => {
            debug!(request_id = %request_id, status = %status, "terminal status observed");
            backend.fetch_tree(&request_id).await
        }
        WaitOutcome::StreamEnded => {
            if scope.is_expired() {
                warn!(request_id = %request_id, timeout_ms = timeout.as_millis() as u64, "workflow did not reach a terminal status in time");
                return Err(SploxError::Timeout { timeout });
            }
            if let Some(err) = stream.error() {
                return Err(err.clone());
            }
            debug!(request_id = %request_id, "stream closed before terminal status, fetching tree");
            backend.fetch_tree(&request_id).await
        }
    }
}

async fn wait_for_terminal(stream: &mut EventStream) -> WaitOutcome {
    while stream.advance().await {
        if let Some(status) = stream.event().and_then(|e| e.terminal_status()) {
            return WaitOutcome::Terminal(status.clone());
        }
    }
    WaitOutcome::StreamEnded
}
