//! Validation errors for scattering inputs.

/// Rejected scattering, planet, or table inputs.
///
/// Everything here is caught before the table builder or the evaluator runs;
/// neither of those has a failure mode of its own.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScatterError {
    /// A radius, scale height, or wavelength that must be strictly positive.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    /// A coefficient that must not be negative.
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f32 },

    /// The atmosphere shell does not enclose the planet.
    #[error("outer radius {outer} must exceed inner radius {inner}")]
    InvertedShell { inner: f32, outer: f32 },

    /// The ray march needs at least one sample.
    #[error("sample count must be at least 1")]
    ZeroSamples,

    /// Henyey-Greenstein g outside `[-1, 1]`.
    #[error("asymmetry factor g must lie in [-1, 1], got {0}")]
    AsymmetryOutOfRange(f32),

    /// Light direction of zero length or with non-finite components.
    #[error("light direction must be a non-zero finite vector")]
    InvalidLightDirection,

    /// Camera position with non-finite components.
    #[error("camera position must be finite")]
    InvalidCamera,

    /// Table grid too coarse to interpolate, or no integration steps.
    #[error(
        "table resolution {altitude}x{angle} with {steps} integration steps is too small (need at least 2x2 and 1 step)"
    )]
    Resolution {
        altitude: usize,
        angle: usize,
        steps: usize,
    },
}
