//! Console and file logging.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_FILE: &str = "tw_extractor.log";

const DEBUG_FILTER: &str = "tw_extractor=debug,twitter=debug";
const INFO_FILTER: &str = "tw_extractor=info,twitter=info";

/// Daily rolling debug log in `dir`. Dropping the guard flushes it.
pub fn file_layer<S>(dir: impl AsRef<Path>) -> (impl Layer<S>, WorkerGuard)
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(EnvFilter::new(DEBUG_FILTER));
    (layer, guard)
}

/// Console output filtered by `RUST_LOG`, or by `verbose` when unset, plus
/// the debug log file in the working directory.
pub fn init(verbose: bool) -> WorkerGuard {
    let default = if verbose { DEBUG_FILTER } else { INFO_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let (file_layer, guard) = file_layer(".");

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_filter(filter))
        .with(file_layer)
        .init();

    guard
}
