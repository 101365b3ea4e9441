use std::time::Duration;

use splox_client::observability::init_tracing;
use splox_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), SploxError> {
    init_tracing();
    let client = Client::from_env()?;

    let version_id = std::env::var("SPLOX_WORKFLOW_VERSION_ID").unwrap_or_default();
    let chat_id = std::env::var("SPLOX_CHAT_ID").unwrap_or_default();
    let start_node_id = std::env::var("SPLOX_START_NODE_ID").unwrap_or_default();

    let params = RunParams::new(version_id, chat_id, start_node_id, "Say hello");
    let tree = client
        .workflows()
        .run_and_wait(&params, Duration::from_secs(300))
        .await?;

    println!("status: {}", tree.execution_tree.status);
    for node in tree.execution_tree.walk_nodes() {
        let label = node.node_label.as_deref().unwrap_or(&node.node_id);
        println!("  {label}: {}", node.status);
    }
    Ok(())
}
