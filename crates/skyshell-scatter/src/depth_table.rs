//! Precomputed optical depth lookup table.
//!
//! The grid spans normalized altitude (0 at the surface, 1 at the top of the
//! atmosphere) against a normalized ray angle (0 straight down toward the
//! planet center, 1 straight up). Each cell holds the density at the ray
//! origin and the optical depth accumulated from there to space, for both the
//! Rayleigh and the Mie layer.

use std::time::Instant;

use glam::Vec3;
use tracing::info;

use crate::error::ScatterError;
use crate::params::{DELTA, PlanetShape};

/// The four channels stored per grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OpticalDepthEntry {
    /// Relative gas density at the ray origin (soft-shadowed toward 0).
    pub rayleigh_density: f32,
    /// Gas optical depth from the origin to the outer boundary.
    pub rayleigh_depth: f32,
    /// Relative aerosol density at the ray origin.
    pub mie_density: f32,
    /// Aerosol optical depth from the origin to the outer boundary.
    pub mie_depth: f32,
}

impl From<[f32; 4]> for OpticalDepthEntry {
    fn from(c: [f32; 4]) -> Self {
        Self {
            rayleigh_density: c[0],
            rayleigh_depth: c[1],
            mie_density: c[2],
            mie_depth: c[3],
        }
    }
}

impl From<OpticalDepthEntry> for [f32; 4] {
    fn from(e: OpticalDepthEntry) -> Self {
        [e.rayleigh_density, e.rayleigh_depth, e.mie_density, e.mie_depth]
    }
}

/// Grid size and integration quality of an [`OpticalDepthTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableResolution {
    /// Cells along the altitude axis.
    pub altitude: usize,
    /// Cells along the angle axis.
    pub angle: usize,
    /// Midpoint samples per integrated ray.
    pub integration_steps: usize,
}

impl Default for TableResolution {
    fn default() -> Self {
        Self {
            altitude: 256,
            angle: 128,
            integration_steps: 50,
        }
    }
}

impl TableResolution {
    fn validate(&self) -> Result<(), ScatterError> {
        if self.altitude < 2 || self.angle < 2 || self.integration_steps == 0 {
            return Err(ScatterError::Resolution {
                altitude: self.altitude,
                angle: self.angle,
                steps: self.integration_steps,
            });
        }
        Ok(())
    }
}

/// Map the cosine between a ray and the local up vector to the table's angle
/// coordinate: `-1` (straight down) → 0, `1` (straight up) → 1.
#[inline]
pub fn angle_coordinate(cos_to_up: f32) -> f32 {
    0.5 + 0.5 * cos_to_up
}

/// Immutable optical depth grid with bilinear lookup.
#[derive(Clone, Debug)]
pub struct OpticalDepthTable {
    shape: PlanetShape,
    resolution: TableResolution,
    /// Row-major: one row per angle, `resolution.altitude` cells per row.
    cells: Vec<[f32; 4]>,
}

impl OpticalDepthTable {
    /// Integrate the table for the given planet.
    pub fn build(shape: &PlanetShape, resolution: TableResolution) -> Result<Self, ScatterError> {
        shape.validate()?;
        resolution.validate()?;

        let started = Instant::now();
        let width = resolution.altitude;
        let height = resolution.angle;
        let inner = shape.inner_radius;
        let outer = shape.outer_radius;
        let thickness = shape.thickness();
        let scale = shape.altitude_scale();
        let steps = resolution.integration_steps;

        let mut cells = vec![[0.0_f32; 4]; width * height];

        // Rows run from straight up downward so a shadowed cell can read the
        // row above it.
        for row in (0..height).rev() {
            let cos = 2.0 * row as f32 / (height - 1) as f32 - 1.0;
            let sin = (1.0 - cos * cos).max(0.0).sqrt();
            let dir = Vec3::new(sin, cos, 0.0);

            for col in 0..width {
                let t = col as f32 / (width - 1) as f32;
                let r = (inner + thickness * t).max(inner + DELTA).min(outer);
                let origin = Vec3::new(0.0, r, 0.0);

                let b = 2.0 * origin.dot(dir);
                let c_part = origin.dot(origin);

                let det = b * b - 4.0 * (c_part - inner * inner);
                let lit = det < 0.0 || {
                    let root = det.sqrt();
                    0.5 * (-b - root) <= 0.0 && 0.5 * (-b + root) <= 0.0
                };

                let (rayleigh_density, mie_density) = if lit {
                    let altitude = (r - inner) * scale;
                    (
                        (-altitude / shape.rayleigh_scale_height).exp(),
                        (-altitude / shape.mie_scale_height).exp(),
                    )
                } else {
                    // Soft shadow: half the density of the cell one step closer to straight up.
                    let above = cells
                        .get((row + 1) * width + col)
                        .copied()
                        .unwrap_or_default();
                    (above[0] * 0.5, above[2] * 0.5)
                };

                let det = (b * b - 4.0 * (c_part - outer * outer)).max(0.0);
                let far = (0.5 * (-b + det.sqrt())).max(0.0);
                let step = far / steps as f32;

                let mut rayleigh_sum = 0.0_f32;
                let mut mie_sum = 0.0_f32;
                for i in 0..steps {
                    let p = origin + dir * (step * (i as f32 + 0.5));
                    let altitude = ((p.length() - inner) * scale).max(0.0);
                    rayleigh_sum += (-altitude / shape.rayleigh_scale_height).exp();
                    mie_sum += (-altitude / shape.mie_scale_height).exp();
                }

                let scaled_step = step * scale;
                cells[row * width + col] = [
                    rayleigh_density,
                    rayleigh_sum * scaled_step,
                    mie_density,
                    mie_sum * scaled_step,
                ];
            }
        }

        info!(
            altitude_cells = width,
            angle_cells = height,
            integration_steps = steps,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "optical depth table built"
        );

        Ok(Self {
            shape: *shape,
            resolution,
            cells,
        })
    }

    /// Planet the table was integrated for.
    pub fn shape(&self) -> &PlanetShape {
        &self.shape
    }

    /// Grid size and integration steps.
    pub fn resolution(&self) -> TableResolution {
        self.resolution
    }

    /// Raw grid cell; `None` outside the grid.
    pub fn cell(&self, altitude_index: usize, angle_index: usize) -> Option<OpticalDepthEntry> {
        if altitude_index >= self.resolution.altitude || angle_index >= self.resolution.angle {
            return None;
        }
        Some(self.cells[angle_index * self.resolution.altitude + altitude_index].into())
    }

    /// Bilinearly interpolate the four channels at `(altitude, angle)`.
    ///
    /// Both coordinates are clamped to `[0, 1]` (NaN reads as 0), so any
    /// input lands inside the grid.
    pub fn interpolate(&self, out: &mut [f32; 4], altitude: f32, angle: f32) {
        let width = self.resolution.altitude;
        let height = self.resolution.angle;

        let x = clamp_unit(altitude) * (width - 1) as f32;
        let y = clamp_unit(angle) * (height - 1) as f32;
        let col = (x as usize).min(width - 2);
        let row = (y as usize).min(height - 2);
        let fx = x - col as f32;
        let fy = y - row as f32;

        let base = row * width + col;
        let c00 = &self.cells[base];
        let c10 = &self.cells[base + 1];
        let c01 = &self.cells[base + width];
        let c11 = &self.cells[base + width + 1];

        for ch in 0..4 {
            out[ch] = c00[ch] * (1.0 - fx) * (1.0 - fy)
                + c10[ch] * fx * (1.0 - fy)
                + c01[ch] * (1.0 - fx) * fy
                + c11[ch] * fx * fy;
        }
    }

    /// By-value form of [`interpolate`](Self::interpolate).
    pub fn sample(&self, altitude: f32, angle: f32) -> OpticalDepthEntry {
        let mut out = [0.0; 4];
        self.interpolate(&mut out, altitude, angle);
        out.into()
    }

    /// Render the grid as an RGBA8 image, `altitude` pixels wide and `angle`
    /// pixels tall, each channel normalized by its maximum.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut max = [0.0_f32; 4];
        for cell in &self.cells {
            for ch in 0..4 {
                max[ch] = max[ch].max(cell[ch]);
            }
        }

        let mut pixels = Vec::with_capacity(self.cells.len() * 4);
        for cell in &self.cells {
            for ch in 0..4 {
                let v = if max[ch] > 0.0 { cell[ch] / max[ch] } else { 0.0 };
                pixels.push((v.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        pixels
    }
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
