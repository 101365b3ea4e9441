//! Hits the real API. Skipped unless `SPLOX_API_KEY` is set.
use splox_client::models::ListParams;
use splox_client::prelude::*;

fn live_client() -> Option<Client> {
    let key = std::env::var("SPLOX_API_KEY").ok()?;
    if key.trim().is_empty() {
        return None;
    }
    Some(Client::from_env().expect("client from env"))
}

#[tokio::test]
async fn live_list_workflows_and_balance() {
    let Some(client) = live_client() else {
        eprintln!("SPLOX_API_KEY not set, skipping live smoke test");
        return;
    };

    let page = client
        .workflows()
        .list(&ListParams::default().limit(1))
        .await
        .expect("list workflows");
    assert!(page.workflows.len() <= 1);

    let balance = client.billing().balance().await.expect("balance");
    assert!(!balance.currency.is_empty());
}
