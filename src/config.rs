use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Capsica";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that overrides the inference strategy.
pub const STRATEGY_ENV: &str = "CAPSICA_STRATEGY";

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Capsica/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Capsica")
}

/// Default location of the SQLite knowledge base.
pub fn knowledge_db_path() -> PathBuf {
    app_data_dir().join("knowledge.db")
}
