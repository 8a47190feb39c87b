//! Scattering parameters: planet shape, runtime tunables, and the per-frame
//! constant snapshot consumed by the evaluator.

use std::f32::consts::PI;
use std::fmt;

use tracing::debug;

use crate::error::ScatterError;

/// Threshold below which ray lengths and light densities count as zero.
pub const DELTA: f32 = 1e-5;

const RAYLEIGH_STEP: f32 = 0.0001;
const MIE_STEP: f32 = 0.0001;
const ASYMMETRY_STEP: f32 = 0.01;
const SUN_BRIGHTNESS_STEP: f32 = 0.1;
const WAVELENGTH_STEP: f32 = 0.001;
const MIN_WAVELENGTH: f32 = 0.001;

/// One of the three sampled wavelengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

impl ColorChannel {
    /// All channels in RGB order.
    pub const ALL: [ColorChannel; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Index into RGB arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
        }
    }
}

/// Planet and atmosphere shell geometry.
///
/// Scale heights are fractions of the shell thickness: a Rayleigh scale
/// height of 0.25 means density falls by 1/e over a quarter of the way from
/// the surface to the top of the atmosphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetShape {
    /// Planet surface radius.
    pub inner_radius: f32,
    /// Top of the atmosphere.
    pub outer_radius: f32,
    /// Rayleigh (gas) scale height.
    pub rayleigh_scale_height: f32,
    /// Mie (aerosol) scale height.
    pub mie_scale_height: f32,
}

impl Default for PlanetShape {
    fn default() -> Self {
        Self {
            inner_radius: 10.0,
            outer_radius: 10.15,
            rayleigh_scale_height: 0.25,
            mie_scale_height: 0.1,
        }
    }
}

impl PlanetShape {
    /// Reject non-positive values and shells that do not enclose the planet.
    pub fn validate(&self) -> Result<(), ScatterError> {
        positive("inner radius", self.inner_radius)?;
        positive("outer radius", self.outer_radius)?;
        positive("rayleigh scale height", self.rayleigh_scale_height)?;
        positive("mie scale height", self.mie_scale_height)?;
        if self.outer_radius <= self.inner_radius {
            return Err(ScatterError::InvertedShell {
                inner: self.inner_radius,
                outer: self.outer_radius,
            });
        }
        Ok(())
    }

    /// Distance from the surface to the top of the atmosphere.
    pub fn thickness(&self) -> f32 {
        self.outer_radius - self.inner_radius
    }

    /// `1 / (outer - inner)`: maps heights above the surface to `[0, 1]`.
    pub fn altitude_scale(&self) -> f32 {
        1.0 / self.thickness()
    }
}

/// A tunable the user can step up or down between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScatterTunable {
    Samples,
    Rayleigh,
    Mie,
    Asymmetry,
    SunBrightness,
    Wavelength(ColorChannel),
}

/// Direction of a tunable step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Nudge {
    Increase,
    Decrease,
}

/// Runtime scattering state owned by the frame driver.
///
/// Mutated between frames; call [`constants`](Self::constants) once before a
/// vertex loop so every vertex in the frame sees the same values.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatteringParameters {
    /// Ray-march samples per shaded point.
    pub samples: u32,
    /// Rayleigh scattering constant (Kr).
    pub rayleigh: f32,
    /// Mie scattering constant (Km).
    pub mie: f32,
    /// Sun brightness (ESun).
    pub sun_brightness: f32,
    /// Henyey-Greenstein asymmetry factor g.
    pub asymmetry: f32,
    wavelengths: [f32; 3],
    wavelengths4: [f32; 3],
    shape: PlanetShape,
}

impl Default for ScatteringParameters {
    fn default() -> Self {
        Self::new(PlanetShape::default())
    }
}

impl ScatteringParameters {
    /// Default tunables for the given planet.
    pub fn new(shape: PlanetShape) -> Self {
        let wavelengths = [0.650, 0.570, 0.475];
        Self {
            samples: 5,
            rayleigh: 0.0025,
            mie: 0.0025,
            sun_brightness: 15.0,
            asymmetry: -0.75,
            wavelengths,
            wavelengths4: wavelengths.map(|w| w.powi(4)),
            shape,
        }
    }

    /// Planet shape the parameters were created for.
    pub fn shape(&self) -> &PlanetShape {
        &self.shape
    }

    /// Wavelengths in micrometres, RGB order.
    pub fn wavelengths(&self) -> [f32; 3] {
        self.wavelengths
    }

    /// Fourth powers of the wavelengths, RGB order.
    pub fn wavelengths4(&self) -> [f32; 3] {
        self.wavelengths4
    }

    /// Set one wavelength; its fourth power is recomputed.
    pub fn set_wavelength(&mut self, channel: ColorChannel, micrometres: f32) {
        let i = channel.index();
        self.wavelengths[i] = micrometres;
        self.wavelengths4[i] = micrometres.powi(4);
    }

    /// Step a tunable by its fixed increment, respecting its floor/ceiling.
    pub fn nudge(&mut self, tunable: ScatterTunable, nudge: Nudge) {
        let sign = match nudge {
            Nudge::Increase => 1.0,
            Nudge::Decrease => -1.0,
        };
        match tunable {
            ScatterTunable::Samples => {
                self.samples = match nudge {
                    Nudge::Increase => self.samples.saturating_add(1),
                    Nudge::Decrease => self.samples.saturating_sub(1).max(1),
                };
            }
            ScatterTunable::Rayleigh => {
                self.rayleigh = (self.rayleigh + sign * RAYLEIGH_STEP).max(0.0);
            }
            ScatterTunable::Mie => {
                self.mie = (self.mie + sign * MIE_STEP).max(0.0);
            }
            ScatterTunable::Asymmetry => {
                self.asymmetry = (self.asymmetry + sign * ASYMMETRY_STEP).clamp(-1.0, 1.0);
            }
            ScatterTunable::SunBrightness => {
                self.sun_brightness = (self.sun_brightness + sign * SUN_BRIGHTNESS_STEP).max(0.0);
            }
            ScatterTunable::Wavelength(channel) => {
                let w = self.wavelengths[channel.index()] + sign * WAVELENGTH_STEP;
                self.set_wavelength(channel, w.max(MIN_WAVELENGTH));
            }
        }
        debug!(?tunable, ?nudge, "scattering parameter adjusted");
    }

    /// Check every field the evaluator relies on.
    pub fn validate(&self) -> Result<(), ScatterError> {
        self.shape.validate()?;
        if self.samples == 0 {
            return Err(ScatterError::ZeroSamples);
        }
        non_negative("rayleigh coefficient", self.rayleigh)?;
        non_negative("mie coefficient", self.mie)?;
        non_negative("sun brightness", self.sun_brightness)?;
        if !(-1.0..=1.0).contains(&self.asymmetry) {
            return Err(ScatterError::AsymmetryOutOfRange(self.asymmetry));
        }
        for channel in ColorChannel::ALL {
            positive("wavelength", self.wavelengths[channel.index()])?;
        }
        Ok(())
    }

    /// Validate and freeze the values for one frame.
    pub fn constants(&self) -> Result<ScatterConstants, ScatterError> {
        self.validate()?;
        Ok(ScatterConstants {
            samples: self.samples,
            kr: self.rayleigh,
            km: self.mie,
            kr_4pi: self.rayleigh * 4.0 * PI,
            km_4pi: self.mie * 4.0 * PI,
            e_sun: self.sun_brightness,
            g: self.asymmetry,
            inv_wavelength4: self.wavelengths4.map(|w4| 1.0 / w4),
            inner_radius: self.shape.inner_radius,
            outer_radius: self.shape.outer_radius,
            scale: self.shape.altitude_scale(),
        })
    }

    /// Human-readable overlay text, one line per tunable.
    pub fn status_lines(&self, fps: f64) -> Vec<String> {
        let mut lines = vec![
            format!("{fps:2.2} FPS"),
            format!("Samples: {}", self.samples),
            format!("Kr: {:<4.4}", self.rayleigh),
            format!("Km: {:<4.4}", self.mie),
            format!("g: {:<2.2}", self.asymmetry),
            format!("ESun: {:<1.1}", self.sun_brightness),
        ];
        for channel in ColorChannel::ALL {
            lines.push(format!(
                "{}: {:<3.3}",
                channel.label(),
                self.wavelengths[channel.index()]
            ));
        }
        lines
    }
}

impl fmt::Display for ScatteringParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "samples={} Kr={:.4} Km={:.4} g={:.2} ESun={:.1} λ=({:.3}, {:.3}, {:.3})",
            self.samples,
            self.rayleigh,
            self.mie,
            self.asymmetry,
            self.sun_brightness,
            self.wavelengths[0],
            self.wavelengths[1],
            self.wavelengths[2],
        )
    }
}

/// Frozen per-frame values with the derived terms precomputed.
///
/// Only obtainable through [`ScatteringParameters::constants`], so every
/// instance has passed validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterConstants {
    pub(crate) samples: u32,
    pub(crate) kr: f32,
    pub(crate) km: f32,
    pub(crate) kr_4pi: f32,
    pub(crate) km_4pi: f32,
    pub(crate) e_sun: f32,
    pub(crate) g: f32,
    pub(crate) inv_wavelength4: [f32; 3],
    pub(crate) inner_radius: f32,
    pub(crate) outer_radius: f32,
    pub(crate) scale: f32,
}

impl ScatterConstants {
    /// Ray-march samples per point.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Henyey-Greenstein asymmetry factor.
    pub fn asymmetry(&self) -> f32 {
        self.g
    }

    /// Planet surface radius.
    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    /// Top of the atmosphere.
    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ScatterError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScatterError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ScatterError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScatterError::Negative { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_validate() {
        let params = ScatteringParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.samples, 5);
        let scale = params.shape().altitude_scale();
        assert!((scale - 1.0 / 0.15).abs() < 1e-3);
    }

    #[test]
    fn test_wavelength4_tracks_wavelength() {
        let mut params = ScatteringParameters::default();
        params.set_wavelength(ColorChannel::Green, 0.5);
        assert!((params.wavelengths4()[1] - 0.0625).abs() < 1e-7);
        assert!((params.wavelengths4()[0] - 0.65_f32.powi(4)).abs() < 1e-7);
    }

    #[test]
    fn test_samples_never_drop_below_one() {
        let mut params = ScatteringParameters::default();
        for _ in 0..10 {
            params.nudge(ScatterTunable::Samples, Nudge::Decrease);
        }
        assert_eq!(params.samples, 1);
        params.nudge(ScatterTunable::Samples, Nudge::Increase);
        assert_eq!(params.samples, 2);
    }

    #[test]
    fn test_asymmetry_clamped_to_unit_range() {
        let mut params = ScatteringParameters::default();
        for _ in 0..100 {
            params.nudge(ScatterTunable::Asymmetry, Nudge::Decrease);
        }
        assert_eq!(params.asymmetry, -1.0);
        for _ in 0..300 {
            params.nudge(ScatterTunable::Asymmetry, Nudge::Increase);
        }
        assert_eq!(params.asymmetry, 1.0);
    }

    #[test]
    fn test_coefficients_floor_at_zero() {
        let mut params = ScatteringParameters::default();
        for _ in 0..40 {
            params.nudge(ScatterTunable::Rayleigh, Nudge::Decrease);
            params.nudge(ScatterTunable::Mie, Nudge::Decrease);
        }
        assert_eq!(params.rayleigh, 0.0);
        assert_eq!(params.mie, 0.0);
        for _ in 0..200 {
            params.nudge(ScatterTunable::SunBrightness, Nudge::Decrease);
        }
        assert_eq!(params.sun_brightness, 0.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_wavelength_floor() {
        let mut params = ScatteringParameters::default();
        params.set_wavelength(ColorChannel::Blue, 0.0015);
        params.nudge(ScatterTunable::Wavelength(ColorChannel::Blue), Nudge::Decrease);
        params.nudge(ScatterTunable::Wavelength(ColorChannel::Blue), Nudge::Decrease);
        assert_eq!(params.wavelengths()[2], MIN_WAVELENGTH);
        assert!(params.wavelengths4()[2] > 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_inputs() {
        let mut params = ScatteringParameters::default();
        params.samples = 0;
        assert_eq!(params.validate(), Err(ScatterError::ZeroSamples));

        let mut params = ScatteringParameters::default();
        params.asymmetry = 1.5;
        assert_eq!(
            params.validate(),
            Err(ScatterError::AsymmetryOutOfRange(1.5))
        );

        let mut params = ScatteringParameters::default();
        params.set_wavelength(ColorChannel::Red, 0.0);
        assert!(matches!(
            params.validate(),
            Err(ScatterError::NonPositive { .. })
        ));

        let mut params = ScatteringParameters::default();
        params.rayleigh = f32::NAN;
        assert!(matches!(params.validate(), Err(ScatterError::Negative { .. })));
    }

    #[test]
    fn test_shape_rejects_inverted_shell() {
        let shape = PlanetShape {
            inner_radius: 10.0,
            outer_radius: 9.0,
            ..PlanetShape::default()
        };
        assert!(matches!(
            shape.validate(),
            Err(ScatterError::InvertedShell { .. })
        ));
        let shape = PlanetShape {
            mie_scale_height: -0.1,
            ..PlanetShape::default()
        };
        assert!(shape.validate().is_err());
    }

    #[test]
    fn test_constants_precompute_derived_terms() {
        let params = ScatteringParameters::default();
        let constants = params.constants().unwrap();
        assert!((constants.kr_4pi - 0.0025 * 4.0 * PI).abs() < 1e-7);
        assert!((constants.inv_wavelength4[2] * 0.475_f32.powi(4) - 1.0).abs() < 1e-5);
        assert_eq!(constants.samples(), 5);
    }

    #[test]
    fn test_status_lines_format() {
        let params = ScatteringParameters::default();
        let lines = params.status_lines(59.94);
        assert_eq!(lines[0], "59.94 FPS");
        assert_eq!(lines[1], "Samples: 5");
        assert_eq!(lines[2], "Kr: 0.0025");
        assert_eq!(lines[4], "g: -0.75");
        assert_eq!(lines[8], "Blue: 0.475");
        assert_eq!(lines.len(), 9);
    }
}
