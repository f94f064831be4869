//! Logging setup.

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the non-blocking log file writer flushing until dropped.
#[allow(missing_copy_implementations)]
#[derive(Debug)]
#[must_use]
pub(crate) struct Trace {
    _file_log_guard: WorkerGuard,
}

/// Log to `logs/opengl_sandbox.log`, and to stderr in debug builds. `RUST_LOG` overrides the
/// default `info` level.
pub(crate) fn initialize() -> Trace {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(env_filter);

    let file_appender = tracing_appender::rolling::daily("logs", "opengl_sandbox.log");
    let (non_blocking_file, _file_log_guard) = tracing_appender::non_blocking(file_appender);
    let registry = registry.with(
        fmt::Layer::new()
            .compact()
            .with_ansi(false)
            .with_line_number(true)
            .with_writer(non_blocking_file),
    );

    #[cfg(debug_assertions)]
    let registry = registry.with(
        fmt::Layer::new()
            .compact()
            .without_time()
            .with_line_number(true)
            .with_writer(std::io::stderr),
    );

    if let Err(err) = registry.try_init() {
        eprintln!("setting tracing default failed: {err}");
    }
    Trace { _file_log_guard }
}
