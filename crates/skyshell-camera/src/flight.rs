//! Input-driven flight model layered on [`CameraState`].

use glam::DVec3;

use crate::camera::CameraState;

/// Flight tuning, in world units and seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct FlightController {
    /// Thruster acceleration in units/s².
    pub thrust: f64,
    /// Thrust multiplier while boosting.
    pub boost_multiplier: f64,
    /// Fraction of velocity shed per second.
    pub damping: f64,
    /// Rotation rate in radians per second at full deflection.
    pub rotate_speed: f64,
    /// Radius the camera bounces off.
    pub inner_radius: f64,
}

impl Default for FlightController {
    fn default() -> Self {
        Self {
            thrust: 1.0,
            boost_multiplier: 10.0,
            damping: 0.1,
            rotate_speed: 1.0,
            inner_radius: 10.0,
        }
    }
}

/// One frame of pilot input. Axis values are expected in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlightInput {
    /// Turn about the camera's up axis; positive turns left.
    pub yaw: f64,
    /// Turn about the camera's right axis; positive tips the nose up.
    pub pitch: f64,
    /// Turn about the view axis.
    pub roll: f64,
    /// Thrust along the view axis.
    pub forward: f64,
    /// Thrust along the right axis.
    pub strafe: f64,
    /// Multiply thrust by the boost factor.
    pub boost: bool,
    /// Kill all velocity this frame.
    pub full_stop: bool,
}

impl FlightController {
    /// Apply one frame of input to `camera`.
    ///
    /// Rotation is applied first, then either a full stop or thrust
    /// integration followed by the surface bounce. Returns `true` if the
    /// camera bounced.
    pub fn step(&self, camera: &mut CameraState, input: &FlightInput, dt: f64) -> bool {
        let turn = self.rotate_speed * dt;
        if input.yaw != 0.0 {
            camera.rotate(camera.up_axis(), input.yaw * turn);
        }
        if input.pitch != 0.0 {
            camera.rotate(camera.right_axis(), input.pitch * turn);
        }
        if input.roll != 0.0 {
            camera.rotate(camera.view_axis(), input.roll * turn);
        }

        if input.full_stop {
            camera.set_velocity(DVec3::ZERO);
            return false;
        }

        let mut magnitude = self.thrust;
        if input.boost {
            magnitude *= self.boost_multiplier;
        }
        let thrust =
            (camera.view_axis() * input.forward + camera.right_axis() * input.strafe) * magnitude;
        camera.accelerate(thrust, dt, self.damping);
        camera.enforce_min_radius(self.inner_radius)
    }
}
