//! Command-line argument parsing for the skyshell viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// skyshell command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "skyshell", about = "Atmospheric scattering viewer")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ray-march samples per vertex.
    #[arg(long)]
    pub samples: Option<u32>,

    /// Number of frames to run.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Shade vertices in parallel.
    #[arg(long)]
    pub parallel: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write the optical depth table to this PNG file after building it.
    #[arg(long)]
    pub dump_table: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(samples) = args.samples {
            self.scattering.samples = samples;
        }
        if let Some(frames) = args.frames {
            self.render.frames = frames;
        }
        if let Some(parallel) = args.parallel {
            self.render.parallel_shading = parallel;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
