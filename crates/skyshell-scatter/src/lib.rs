//! Atmospheric in-scattering: Rayleigh + Mie single scattering evaluated per
//! vertex against a precomputed optical depth table.

mod depth_table;
mod error;
mod evaluator;
mod params;

pub use depth_table::{OpticalDepthEntry, OpticalDepthTable, TableResolution, angle_coordinate};
pub use error::ScatterError;
pub use evaluator::{BLACK, DepthCombine, ShadeFrame, mie_phase, rayleigh_phase, shade};
pub use params::{
    ColorChannel, DELTA, Nudge, PlanetShape, ScatterConstants, ScatterTunable,
    ScatteringParameters,
};
