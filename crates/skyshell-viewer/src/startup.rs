//! Process startup: config directory, logging, then the config file.

use std::path::PathBuf;

use skyshell_config::{CliArgs, Config, default_config_dir};
use skyshell_log::{LogHandle, MakeWriter};
use tracing::info;

use crate::error::ViewerError;

/// Everything the frame loop needs from startup.
pub struct Startup {
    pub config_dir: PathBuf,
    pub config: Config,
    pub log: LogHandle,
}

/// Resolve the config directory, install logging, then load the config.
///
/// Logging comes up first with the filter from `RUST_LOG` or `--log-level`,
/// so the config load itself is logged. The file's `debug.log_level` takes
/// over once the config is read, unless `RUST_LOG` is set.
pub fn start<W>(args: &CliArgs, console: W, debug_build: bool) -> Result<Startup, ViewerError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let config_dir = match &args.config {
        Some(dir) => dir.clone(),
        None => default_config_dir()?,
    };

    let mut early = Config::default();
    early.apply_cli_overrides(args);
    let log = skyshell_log::init_logging_with_writer(
        console,
        Some(&config_dir.join("logs")),
        debug_build,
        Some(&early),
    );

    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(args);
    log.apply_config(&config);
    info!(config_dir = %config_dir.display(), "skyshell viewer starting");

    Ok(Startup {
        config_dir,
        config,
        log,
    })
}
