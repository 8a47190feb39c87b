//! Configuration system for skyshell.
//!
//! Provides the planet, scattering, camera and render settings that persist to
//! disk as RON files. Supports CLI overrides via clap, hot-reload detection, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, PlanetConfig, RenderConfig, ScatteringConfig,
    default_config_dir,
};
pub use error::ConfigError;
