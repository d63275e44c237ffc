use tracing_subscriber::EnvFilter;

/// Configure tracing once at application startup for the entire process.
///
/// `RUST_LOG` controls verbosity; defaults to `info` when unset.
pub fn setup_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
