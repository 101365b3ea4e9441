use std::time::Duration;

use splox_client::observability::init_tracing;
use splox_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), SploxError> {
    init_tracing();
    let client = Client::from_env()?;
    let chat_id = std::env::var("SPLOX_CHAT_ID").unwrap_or_default();

    let mut stream = client
        .chats()
        .listen(&chat_id, WaitScope::with_timeout(Duration::from_secs(120)))
        .await?;

    while stream.advance().await {
        let Some(event) = stream.event() else { continue };
        let Some(fields) = event.fields() else { continue };
        match event.kind() {
            Some(ChatEventKind::TextDelta) => print!("{}", fields.delta.as_deref().unwrap_or_default()),
            Some(ChatEventKind::ToolStart) => {
                eprintln!("\n[tool] {}", fields.tool_name.as_deref().unwrap_or("?"))
            }
            Some(ChatEventKind::Error) => {
                eprintln!("\n[error] {}", fields.error.as_deref().unwrap_or_default())
            }
            Some(ChatEventKind::Done | ChatEventKind::Stopped) => {
                println!();
                break;
            }
            _ => {}
        }
    }

    let result = stream.error().cloned();
    stream.close();
    result.map_or(Ok(()), Err)
}
