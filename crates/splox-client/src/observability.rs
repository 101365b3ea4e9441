use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

static INIT: OnceCell<()> = OnceCell::new();

fn resolve_env_filter() -> tracing_subscriber::EnvFilter {
    if let Ok(level) = std::env::var("SPLOX_LOG_LEVEL")
        && let Ok(filter) = tracing_subscriber::EnvFilter::try_new(level)
    {
        return filter;
    }
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn json_requested() -> bool {
    std::env::var("SPLOX_LOG_FORMAT")
        .is_ok_and(|v| v.trim().eq_ignore_ascii_case("json"))
}

/// Install a global `tracing` subscriber once per process.
///
/// The library itself only emits events; call this from binaries and examples
/// that want to see them. Does nothing if a subscriber is already installed.
///
/// Environment variables:
/// - `SPLOX_LOG_LEVEL`: level/filter override (`info`, `splox_client=debug`, ...).
/// - `RUST_LOG`: fallback filter. Defaults to `info`.
/// - `SPLOX_LOG_FORMAT=json`: emit JSON lines instead of the compact console format.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let env_filter = resolve_env_filter();
        if json_requested() {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(false)
                .with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .try_init();
        } else {
            let console_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init();
        }
    });
}
