use std::sync::Arc;
use std::time::Duration;

use crate::errors::SploxError;
use crate::models::{
    ExecutionTreeResponse, HistoryParams, HistoryResponse, ListParams, RunParams, RunResponse,
    StartNodesResponse, WorkflowFullResponse, WorkflowListResponse, WorkflowVersion,
    WorkflowVersionListResponse,
};
use crate::stream::EventStream;
use crate::transport::{Call, Query, Transport};
use crate::wait::{ExecutionBackend, WaitScope, run_and_wait};

use super::validate_id;

/// Workflows and workflow executions.
#[derive(Clone)]
pub struct Workflows {
    transport: Arc<Transport>,
}

impl Workflows {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Lists the caller's workflows.
    pub async fn list(&self, params: &ListParams) -> Result<WorkflowListResponse, SploxError> {
        let query = Query::new()
            .positive("limit", params.limit)
            .text("cursor", params.cursor.as_deref())
            .text("search", params.search.as_deref());
        self.transport
            .send_json(Call::get("/workflows").query(query))
            .await
    }

    /// Returns a workflow with its draft version, nodes and edges.
    pub async fn get(&self, workflow_id: &str) -> Result<WorkflowFullResponse, SploxError> {
        validate_id("workflow_id", workflow_id)?;
        self.transport
            .send_json(Call::get(format!("/workflows/{workflow_id}")))
            .await
    }

    pub async fn latest_version(&self, workflow_id: &str) -> Result<WorkflowVersion, SploxError> {
        validate_id("workflow_id", workflow_id)?;
        self.transport
            .send_json(Call::get(format!("/workflows/{workflow_id}/versions/latest")))
            .await
    }

    pub async fn list_versions(
        &self,
        workflow_id: &str,
    ) -> Result<WorkflowVersionListResponse, SploxError> {
        validate_id("workflow_id", workflow_id)?;
        self.transport
            .send_json(Call::get(format!("/workflows/{workflow_id}/versions")))
            .await
    }

    /// Returns the start nodes of a workflow version.
    pub async fn start_nodes(
        &self,
        workflow_version_id: &str,
    ) -> Result<StartNodesResponse, SploxError> {
        validate_id("workflow_version_id", workflow_version_id)?;
        self.transport
            .send_json(Call::get(format!("/workflows/{workflow_version_id}/start-nodes")))
            .await
    }

    /// Triggers an execution. The response carries the new request id.
    pub async fn run(&self, params: &RunParams) -> Result<RunResponse, SploxError> {
        validate_id("workflow_version_id", &params.workflow_version_id)?;
        validate_id("start_node_id", &params.start_node_id)?;
        self.transport
            .send_json(Call::post("/workflow-requests/run").json(params))
            .await
    }

    /// Opens the live event stream of an execution.
    pub async fn listen(
        &self,
        workflow_request_id: &str,
        scope: WaitScope,
    ) -> Result<EventStream, SploxError> {
        validate_id("workflow_request_id", workflow_request_id)?;
        self.transport
            .open_stream(&format!("/workflow-requests/{workflow_request_id}/listen"), scope)
            .await
    }

    /// Returns the complete execution hierarchy of a request.
    pub async fn execution_tree(
        &self,
        workflow_request_id: &str,
    ) -> Result<ExecutionTreeResponse, SploxError> {
        validate_id("workflow_request_id", workflow_request_id)?;
        self.transport
            .send_json(Call::get(format!(
                "/workflow-requests/{workflow_request_id}/execution-tree"
            )))
            .await
    }

    /// Paginated execution history.
    pub async fn history(
        &self,
        workflow_request_id: &str,
        params: &HistoryParams,
    ) -> Result<HistoryResponse, SploxError> {
        validate_id("workflow_request_id", workflow_request_id)?;
        let query = Query::new()
            .positive("limit", params.limit)
            .text("cursor", params.cursor.as_deref())
            .text("search", params.search.as_deref());
        self.transport
            .send_json(
                Call::get(format!("/workflow-requests/{workflow_request_id}/history")).query(query),
            )
            .await
    }

    /// Cancels a running execution.
    pub async fn stop(&self, workflow_request_id: &str) -> Result<(), SploxError> {
        validate_id("workflow_request_id", workflow_request_id)?;
        self.transport
            .send_unit(Call::post(format!("/workflow-requests/{workflow_request_id}/stop")))
            .await
    }

    /// Triggers a workflow and waits up to `timeout` for a terminal status.
    /// See [`crate::wait::run_and_wait`].
    pub async fn run_and_wait(
        &self,
        params: &RunParams,
        timeout: Duration,
    ) -> Result<ExecutionTreeResponse, SploxError> {
        run_and_wait(self, params, timeout).await
    }
}

#[async_trait::async_trait]
impl ExecutionBackend for Workflows {
    async fn trigger(&self, params: &RunParams) -> Result<RunResponse, SploxError> {
        self.run(params).await
    }

    async fn open_listen(
        &self,
        workflow_request_id: &str,
        scope: WaitScope,
    ) -> Result<EventStream, SploxError> {
        self.listen(workflow_request_id, scope).await
    }

    async fn fetch_tree(
        &self,
        workflow_request_id: &str,
    ) -> Result<ExecutionTreeResponse, SploxError> {
        self.execution_tree(workflow_request_id).await
    }
}
