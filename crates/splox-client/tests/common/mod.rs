#![allow(dead_code)]

use splox_client::{Client, ClientConfig};
use wiremock::MockServer;

pub const API_KEY: &str = "sk-test";

pub fn client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(API_KEY).base_url(server.uri())).expect("client")
}

pub fn anonymous_client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::new("").base_url(server.uri())).expect("client")
}

pub fn sse(body: &str) -> wiremock::ResponseTemplate {
    wiremock::ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream")
}

pub fn tree_json(request_id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "execution_tree": {
            "workflow_request_id": request_id,
            "status": status,
            "created_at": "2026-01-01T00:00:00Z",
            "nodes": [
                {
                    "id": "ne-1",
                    "node_id": "n-start",
                    "status": "completed",
                    "node_label": "Start",
                    "child_executions": [
                        {
                            "index": 0,
                            "workflow_request_id": "child-1",
                            "status": "completed",
                            "nodes": [{"id": "ne-2", "node_id": "n-agent", "status": "completed"}]
                        }
                    ]
                }
            ]
        }
    })
}
