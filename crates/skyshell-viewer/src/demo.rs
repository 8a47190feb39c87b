//! Scripted pilot for headless runs.
//!
//! Cycles through five two-second maneuvers at 60 frames per second and
//! periodically nudges the scattering tunables so a long run exercises every
//! part of the frame update.

use skyshell_camera::FlightInput;
use skyshell_scatter::{ColorChannel, Nudge, ScatterTunable};

use crate::scene::FrameInput;

/// Frames spent in each maneuver.
pub const PHASE_FRAMES: u64 = 120;

const NUDGE_SCHEDULE: [(ScatterTunable, Nudge); 6] = [
    (ScatterTunable::Samples, Nudge::Increase),
    (ScatterTunable::Asymmetry, Nudge::Increase),
    (ScatterTunable::SunBrightness, Nudge::Increase),
    (ScatterTunable::Wavelength(ColorChannel::Red), Nudge::Decrease),
    (ScatterTunable::Rayleigh, Nudge::Increase),
    (ScatterTunable::Mie, Nudge::Decrease),
];

/// Produces one [`FrameInput`] per frame.
#[derive(Clone, Debug, Default)]
pub struct DemoPilot {
    frame: u64,
}

impl DemoPilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames produced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Input for the next frame.
    pub fn next_input(&mut self) -> FrameInput {
        let frame = self.frame;
        self.frame += 1;

        let flight = match (frame / PHASE_FRAMES) % 5 {
            // Dive toward the planet.
            0 => FlightInput {
                forward: 1.0,
                boost: true,
                ..Default::default()
            },
            1 => FlightInput {
                yaw: 0.5,
                forward: 0.5,
                ..Default::default()
            },
            2 => FlightInput {
                pitch: 0.3,
                strafe: 0.5,
                ..Default::default()
            },
            3 => FlightInput {
                roll: 0.4,
                forward: -0.5,
                ..Default::default()
            },
            _ => FlightInput {
                full_stop: true,
                ..Default::default()
            },
        };

        let mut nudges = Vec::new();
        if frame % PHASE_FRAMES == PHASE_FRAMES - 1 {
            let slot = (frame / PHASE_FRAMES) as usize % NUDGE_SCHEDULE.len();
            nudges.push(NUDGE_SCHEDULE[slot]);
        }

        FrameInput { flight, nudges }
    }
}
