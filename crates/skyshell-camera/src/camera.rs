//! Camera pose and velocity in double precision.

use glam::{DQuat, DVec3};
use tracing::debug;

/// Relative clearance kept above the inner sphere after a bounce.
pub const BOUNCE_EPSILON: f64 = 1e-5;

/// Position, velocity and orientation of the viewpoint.
///
/// The camera looks down its local −Z axis with +Y up, so the identity
/// orientation views along world −Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    position: DVec3,
    velocity: DVec3,
    orientation: DQuat,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(DVec3::ZERO)
    }
}

impl CameraState {
    /// A camera at rest at `position` with identity orientation.
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            velocity: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: DVec3) {
        self.velocity = velocity;
    }

    /// Local +X in world space.
    pub fn right_axis(&self) -> DVec3 {
        self.orientation * DVec3::X
    }

    /// Local +Y in world space.
    pub fn up_axis(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    /// Viewing direction (local −Z) in world space.
    pub fn view_axis(&self) -> DVec3 {
        self.orientation * DVec3::NEG_Z
    }

    /// Rotate by `angle` radians about a world-space `axis`.
    ///
    /// A zero or non-finite axis leaves the orientation unchanged.
    pub fn rotate(&mut self, axis: DVec3, angle: f64) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        self.orientation = (DQuat::from_axis_angle(axis, angle) * self.orientation).normalize();
    }

    /// Integrate one step of damped thrust: `v += (thrust − v·damping)·dt`,
    /// then `p += v·dt`.
    pub fn accelerate(&mut self, thrust: DVec3, dt: f64, damping: f64) {
        self.velocity += (thrust - self.velocity * damping) * dt;
        self.position += self.velocity * dt;
    }

    /// Push the camera back out if it has sunk below the inner sphere.
    ///
    /// The position is projected onto radius `inner_radius·(1 + ε)` and the
    /// velocity is negated. Returns `true` when a bounce happened.
    pub fn enforce_min_radius(&mut self, inner_radius: f64) -> bool {
        let min_radius = inner_radius * (1.0 + BOUNCE_EPSILON);
        let height = self.position.length();
        if !(height < min_radius) {
            return false;
        }

        let up = self.position.try_normalize().unwrap_or(DVec3::Z);
        self.position = up * min_radius;
        self.velocity = -self.velocity;
        debug!(height, min_radius, "camera bounced off the planet surface");
        true
    }
}
