use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "fitforum_client=info";

/// Sends client logs to stderr so command output on stdout stays clean.
///
/// `RUST_LOG` overrides the default filter. Returns `false` when a global
/// subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
