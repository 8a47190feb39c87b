//! Free-flying viewpoint around the planet: orientation, damped thrust and a
//! surface bounce that keeps the camera outside the inner sphere.

pub mod camera;
pub mod flight;

pub use camera::{BOUNCE_EPSILON, CameraState};
pub use flight::{FlightController, FlightInput};
