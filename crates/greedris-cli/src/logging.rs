use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

/// Installs the global subscriber. Warnings and errors are always shown; each
/// `-v` lowers the threshold by one level.
pub(crate) fn init(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(LevelFilter::from_level(level))
        .init();
    tracing::debug!(%level, "logging initialized");
}
