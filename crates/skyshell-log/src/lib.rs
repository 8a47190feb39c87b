//! Structured logging for skyshell.
//!
//! Console output with uptime timestamps and module paths, plus JSON file
//! logging in debug builds. The filter comes from `RUST_LOG` when set, then
//! from the config's `debug.log_level`.

use skyshell_config::Config;
use std::path::Path;

pub use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "skyshell.log";

/// Resolve the filter directive string from an optional config.
pub fn filter_directives(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Swaps the active filter after startup.
///
/// Logging is installed before the config file is read so config load events
/// are captured; the file's `debug.log_level` is applied afterwards through
/// this handle.
#[derive(Clone)]
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Replace the filter with `config.debug.log_level`.
    ///
    /// Does nothing when `RUST_LOG` chose the filter. Returns `true` if the
    /// filter changed.
    pub fn apply_config(&self, config: &Config) -> bool {
        if self.from_env {
            return false;
        }
        match EnvFilter::try_new(filter_directives(Some(config))) {
            Ok(filter) => self.filter.reload(filter).is_ok(),
            Err(_) => false,
        }
    }
}

/// Install the global tracing subscriber with console output on stdout.
///
/// `log_dir` is only used when `debug_build` is set; failure to create the
/// directory or file silently falls back to console-only output. Calling this
/// twice is harmless: the second subscriber is dropped.
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> LogHandle {
    init_logging_with_writer(std::io::stdout, log_dir, debug_build, config)
}

/// [`init_logging`] with the console layer writing to `writer`.
pub fn init_logging_with_writer<W>(
    writer: W,
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> LogHandle
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (env_filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => {
            let filter = EnvFilter::try_new(filter_directives(config))
                .unwrap_or_else(|_| default_env_filter());
            (filter, false)
        }
    };
    let (filter_layer, filter) = reload::Layer::new(env_filter);
    let handle = LogHandle { filter, from_env };

    let console_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        let _ = subscriber.with(file_layer).try_init();
        return handle;
    }

    let _ = subscriber.try_init();
    handle
}

/// An `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
