//! Logging to the javascript console in the browser, or stderr natively.

use tracing_subscriber::{EnvFilter, prelude::*};

const DEFAULT_FILTER: &str = "error,ui=debug";

/// Initialize logging. Safe to call more than once; later calls are no-ops.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    use tracing_web::MakeWebConsoleWriter;

    let env_filter = EnvFilter::new(DEFAULT_FILTER);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_ansi(false) // Only partially supported across browsers
        .without_time() // std::time is not available in browsers
        .with_writer(MakeWebConsoleWriter::new().with_pretty_level())
        .with_level(false);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
    {
        tracing::info!("Initialized logs");
    }
}

/// Initialize logging. Safe to call more than once; later calls are no-ops.
///
/// `RUST_LOG` overrides the default filter.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
    {
        tracing::info!("Initialized logs");
    }
}
