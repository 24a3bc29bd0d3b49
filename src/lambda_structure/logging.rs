use lambda_runtime::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{filter::LevelFilter, prelude::*, reload, Registry};

pub type LevelHandle = reload::Handle<LevelFilter, Registry>;

/// Installs the bunyan JSON subscriber used by every lambda.
///
/// The returned guard flushes the non blocking writer and must be kept alive
/// for as long as the lambda runs.
pub fn init_lambda_logging() -> Result<(LevelHandle, WorkerGuard), Error> {
    LogTracer::init()?;

    let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking_writer);

    // Instantiate a tracing subscriber with reloadable level filter
    let (filter, reload_handle) = reload::Layer::new(LevelFilter::WARN);
    tracing_subscriber::registry()
        .with(filter)
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer)
        .init();

    Ok((reload_handle, guard))
}

pub fn level_for(verbose_mode: bool) -> LevelFilter {
    if verbose_mode {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Sets the level of the current invocation.
pub fn apply_verbose_mode(reload_handle: &LevelHandle, verbose_mode: bool) {
    reload_handle
        .modify(|filter| *filter = level_for(verbose_mode))
        .unwrap_or_else(|e| tracing::error!(error = ?e, "{:?}", e));
}

/// Plain text logging on stderr for the command line tools.
pub fn init_cli_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level_for(verbose))
        .init();
}
