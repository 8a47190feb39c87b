//! Headless frame driver for the skyshell atmosphere.
//!
//! Owns the scene (planet and sky meshes, optical depth table, camera and
//! tunables) and advances it one frame at a time.

pub mod demo;
pub mod error;
pub mod frame_stats;
pub mod scene;
pub mod startup;
pub mod table_image;

pub use demo::DemoPilot;
pub use error::ViewerError;
pub use frame_stats::FrameStats;
pub use scene::{AtmosphereScene, FrameInput, FrameReport};
pub use startup::{Startup, start};
pub use table_image::write_table_png;
