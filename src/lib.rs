pub mod config;
pub mod models;
pub mod kb;
pub mod engine;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Called once by the embedding application before any knowledge base is
/// loaded. Honors `RUST_LOG`, falling back to `config::default_log_filter()`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Capsica starting v{}", config::APP_VERSION);
}
