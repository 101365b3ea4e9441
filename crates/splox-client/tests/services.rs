mod common;

use splox_client::models::{
    ChatHistoryParams, CreateChatParams, ListParams, MemoryDeleteParams, MemoryGetParams,
    MemorySummarizeParams, MemoryTarget, TransactionHistoryParams,
};
use splox_client::prelude::*;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{anonymous_client_for, client_for};

#[tokio::test]
async fn workflows_list_sends_only_set_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflows"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "report"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "workflows": [{"id": "wf-1", "user_id": "u-1"}],
            "pagination": {"limit": 10, "next_cursor": "c-2", "has_more": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = ListParams::default().limit(10).search("report");
    let page = client_for(&server)
        .workflows()
        .list(&params)
        .await
        .expect("list");
    assert_eq!(page.workflows.len(), 1);
    assert_eq!(page.workflows[0].id, "wf-1");
    assert_eq!(page.pagination.next_cursor.as_deref(), Some("c-2"));
    assert!(page.pagination.has_more);

    let requests = server.received_requests().await.expect("recording on");
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(!query.contains("cursor"), "{query}");
}

#[tokio::test]
async fn stop_accepts_empty_no_content_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workflow-requests/req-1/stop"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .workflows()
        .stop("req-1")
        .await
        .expect("stop");
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workflows/wf-1/versions/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .workflows()
        .latest_version("wf-1")
        .await
        .expect_err("decode");
    assert!(matches!(err, SploxError::Decode(ref msg) if msg.contains("/workflows/wf-1/versions/latest")));
}

#[tokio::test]
async fn rate_limit_keeps_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/billing/balance"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "30")
                .set_body_json(serde_json::json!({"error": "slow down"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .billing()
        .balance()
        .await
        .expect_err("429");
    match err {
        SploxError::RateLimited { error, retry_after } => {
            assert_eq!(error.status_code, 429);
            assert_eq!(error.message, "slow down");
            assert_eq!(retry_after.as_deref(), Some("30"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn status_codes_map_to_variants() {
    let server = MockServer::start().await;
    for (id, status) in [("c-403", 403), ("c-410", 410), ("c-404", 404)] {
        Mock::given(method("GET"))
            .and(path(format!("/chats/{id}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(""))
            .mount(&server)
            .await;
    }

    let chats = client_for(&server).chats();
    assert!(matches!(chats.get("c-403").await, Err(SploxError::Forbidden(_))));
    assert!(matches!(chats.get("c-410").await, Err(SploxError::Gone(_))));
    assert!(matches!(chats.get("c-404").await, Err(SploxError::NotFound(_))));
}

#[tokio::test]
async fn chat_create_defaults_resource_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_json(serde_json::json!({
            "name": "Support",
            "resource_id": "wf-1",
            "resource_type": "api",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chat-1",
            "name": "Support",
            "resource_type": "api",
            "resource_id": "wf-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let chat = client_for(&server)
        .chats()
        .create(&CreateChatParams::new("Support", "wf-1"))
        .await
        .expect("create");
    assert_eq!(chat.id, "chat-1");
    assert_eq!(chat.resource_type.as_deref(), Some("api"));
}

#[tokio::test]
async fn chat_history_pages_backwards() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat-history/chat-1/paginated"))
        .and(query_param("limit", "5"))
        .and(query_param("before", "2026-01-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [{
                "id": "m-1",
                "chat_id": "chat-1",
                "role": "assistant",
                "content": [{"type": "text", "text": "hi"}]
            }],
            "has_more": false
        })))
        .mount(&server)
        .await;

    let params = ChatHistoryParams {
        limit: Some(5),
        before: Some("2026-01-01T00:00:00Z".into()),
    };
    let history = client_for(&server)
        .chats()
        .history("chat-1", &params)
        .await
        .expect("history");
    assert_eq!(history.messages.len(), 1);
    assert_eq!(history.messages[0].content[0].text.as_deref(), Some("hi"));
    assert!(!history.has_more);
}

#[tokio::test]
async fn event_send_without_key_uses_secret_header_and_empty_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events/wh-1"))
        .and(header("x-webhook-secret", "s3cret"))
        .and(body_json(serde_json::json!({})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true, "event_id": "ev-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = anonymous_client_for(&server)
        .events()
        .send(&SendEventParams::new("wh-1").secret("s3cret"))
        .await
        .expect("send");
    assert!(response.ok);
    assert_eq!(response.event_id, "ev-1");

    let requests = server.received_requests().await.expect("recording on");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn billing_transactions_formats_amounts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/billing/transactions"))
        .and(query_param("page", "2"))
        .and(query_param("types", "credit,debit"))
        .and(query_param("min_amount", "1.500000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "transactions": [{
                "id": "t-1",
                "user_id": "u-1",
                "amount": 1500000,
                "currency": "USD",
                "type": "credit",
                "status": "completed",
                "created_at": "2026-01-01T00:00:00Z",
                "updated_at": "2026-01-01T00:00:00Z"
            }],
            "pagination": {"page": 2, "limit": 20, "total_count": 21, "total_pages": 2, "has_next": false, "has_prev": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = TransactionHistoryParams {
        page: Some(2),
        types: Some("credit,debit".into()),
        min_amount: Some(1.5),
        ..Default::default()
    };
    let history = client_for(&server)
        .billing()
        .transactions(&params)
        .await
        .expect("transactions");
    assert_eq!(history.transactions[0].transaction_type, "credit");
    assert!(history.pagination.has_prev);
}

#[tokio::test]
async fn daily_activity_passes_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/activity/daily"))
        .and(query_param("days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"date": "2026-01-01", "total_cost": 0.25, "request_count": 3, "node_count": 9}],
            "days": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let activity = client_for(&server)
        .billing()
        .daily_activity(Some(7))
        .await
        .expect("daily");
    assert_eq!(activity.days, 7);
    assert_eq!(activity.data[0].request_count, 3);
}

#[tokio::test]
async fn memory_actions_post_action_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat-memory/agent-1/actions"))
        .and(body_json(serde_json::json!({
            "action": "summarize",
            "context_memory_id": "cm-1",
            "workflow_version_id": "wv-1",
            "keep_last_n": 3,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "action": "summarize",
            "message": "ok",
            "summary": "short",
            "remaining_count": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = MemorySummarizeParams {
        target: MemoryTarget::new("cm-1", "wv-1"),
        keep_last_n: Some(3),
        summarize_prompt: None,
    };
    let result = client_for(&server)
        .memory()
        .summarize("agent-1", &params)
        .await
        .expect("summarize");
    assert_eq!(result.summary.as_deref(), Some("short"));
    assert_eq!(result.remaining_count, 4);
}

#[tokio::test]
async fn memory_get_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat-memory/agent-1"))
        .and(query_param("chat_id", "cm-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [{"id": "mm-1", "role": "user", "content": "hello"}],
            "has_more": false,
            "limit": 20
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/chat-memories/cm-1"))
        .and(body_json(serde_json::json!({
            "memory_node_id": "agent-1",
            "workflow_version_id": "wv-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let memory = client_for(&server).memory();
    let params = MemoryGetParams {
        chat_id: Some("cm-1".into()),
        ..Default::default()
    };
    let page = memory.get("agent-1", &params).await.expect("get");
    assert_eq!(page.messages[0].role, "user");
    assert_eq!(page.limit, 20);

    memory
        .delete(
            "cm-1",
            &MemoryDeleteParams {
                memory_node_id: "agent-1".into(),
                workflow_version_id: "wv-1".into(),
            },
        )
        .await
        .expect("delete");
}
