//! Utility functions used by the Lunar CLI.

/// Initialize the tracing logger.
///
/// Reads the filter from `RUST_LOG`; logs go to stderr so results on stdout
/// stay clean.
pub fn init_logger() {
    if let Err(e) = try_init_logger() {
        eprintln!("warning: failed to initialize the logger: {e}");
    }
}

fn try_init_logger() -> Result<(), String> {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| e.to_string())
}
