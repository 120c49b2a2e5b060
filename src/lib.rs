pub mod agent;
pub mod computer;
pub mod config;
pub mod daemon;
pub mod decision;
pub mod errors;
pub mod replay;

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// default `info` filter. Called once from each binary entry point.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
