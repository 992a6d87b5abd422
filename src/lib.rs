pub mod analysis;
pub mod commands;
pub mod core;

use tracing_subscriber::{filter::LevelFilter, EnvFilter};

pub use crate::analysis::resolver::{resolve, resolve_blocks};
pub use crate::core::config::ResolverConfig;
pub use crate::core::errors::{AppError, AppResult};
pub use crate::core::types::ProcessedDocument;

pub const LOG_ENV: &str = "BLOCKGRAPH_LOG";

pub fn log_level_from_env() -> LevelFilter {
    level_from_str(&std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string()))
}

fn level_from_str(raw: &str) -> LevelFilter {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Installs a stderr subscriber. `verbosity` raises the env level one step
/// per count; stdout stays reserved for the resolved document.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => log_level_from_env(),
        1 => log_level_from_env().max(LevelFilter::DEBUG),
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
