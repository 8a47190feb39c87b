//! UV-sphere tessellation for the planet surface and its atmosphere shell.

pub mod error;
pub mod sphere;

pub use error::MeshError;
pub use sphere::{SphereMesh, SphereVertex, Winding};
