use tracing_subscriber::{EnvFilter, fmt};

/// Initializes tracing. `RUST_LOG` wins when set; otherwise the crate's own
/// spans log at info and everything else stays quiet.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dbchat=info"));

    fmt().with_env_filter(env_filter).with_target(true).init();
}
