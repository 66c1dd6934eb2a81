use std::fs;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "prohub_seo=info,prohub_web=info,prohub_core=info,warn";

/// Initializes the logging system with both console and file output.
///
/// Console output is human readable; the file under `dir` is JSON, rotated
/// daily. `RUST_LOG` overrides the default filter.
pub fn init_logging(dir: &Path, file_name: &str) {
    // Ensure logs directory exists
    let _ = fs::create_dir_all(dir);

    let file_appender = tracing_appender::rolling::daily(dir, file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stdout);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // try_init so tests and repeated CLI invocations in-process don't panic
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    // The guard must outlive the process or buffered lines are lost on exit
    std::mem::forget(guard);
}
