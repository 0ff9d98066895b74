use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber, honouring `RUST_LOG` and defaulting to `info`.
/// Logs go to stderr so stdout stays free for session output.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Records a user interaction on the `analytics` target.
pub fn track_event(category: &str, action: &str, label: &str) {
    tracing::info!(target: "analytics", category, action, label, "event");
}
