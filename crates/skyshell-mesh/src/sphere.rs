//! Pole-to-pole sphere mesh with per-vertex colors.
//!
//! Vertex 0 sits at the +Z pole and the last vertex at the −Z pole. Between
//! them are `sections − 1` rings of `slices` vertices each, ordered from the
//! top ring down. Colors start opaque black and are rewritten every frame by
//! the scattering pass.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::error::MeshError;

/// A sphere vertex laid out for direct upload as a vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Linear RGBA color.
    pub color: [f32; 4],
}

impl SphereVertex {
    fn at(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Position as a glam vector.
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Store an RGB color with alpha 1.
    #[inline]
    pub fn set_rgb(&mut self, rgb: [f32; 3]) {
        self.color = [rgb[0], rgb[1], rgb[2], 1.0];
    }
}

/// Triangle orientation when seen from outside the sphere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    /// Front faces point outward. Used for the planet surface.
    CounterClockwise,
    /// Front faces point inward. Used for the atmosphere shell so its inside is visible.
    Clockwise,
}

/// Tessellated sphere owning its vertex storage.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    radius: f32,
    slices: u32,
    sections: u32,
    vertices: Vec<SphereVertex>,
}

impl SphereMesh {
    /// Build a sphere of `radius` with `slices` longitudinal divisions and
    /// `sections` latitudinal bands.
    ///
    /// Produces `slices × (sections − 1) + 2` vertices, every one at distance
    /// `radius` from the origin.
    pub fn generate(radius: f32, slices: u32, sections: u32) -> Result<Self, MeshError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(MeshError::InvalidRadius(radius));
        }
        if slices < 3 {
            return Err(MeshError::TooFewSlices(slices));
        }
        if sections < 2 {
            return Err(MeshError::TooFewSections(sections));
        }

        let count = slices as usize * (sections as usize - 1) + 2;
        let mut vertices = Vec::with_capacity(count);
        vertices.push(SphereVertex::at(Vec3::new(0.0, 0.0, radius)));

        for j in 1..sections {
            let theta = PI * j as f32 / sections as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for i in 0..slices {
                let phi = TAU * i as f32 / slices as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let dir = Vec3::new(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta);
                vertices.push(SphereVertex::at(dir.normalize() * radius));
            }
        }

        vertices.push(SphereVertex::at(Vec3::new(0.0, 0.0, -radius)));
        debug_assert_eq!(vertices.len(), count);

        Ok(Self {
            radius,
            slices,
            sections,
            vertices,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn slices(&self) -> u32 {
        self.slices
    }

    pub fn sections(&self) -> u32 {
        self.sections
    }

    pub fn vertices(&self) -> &[SphereVertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [SphereVertex] {
        &mut self.vertices
    }

    /// Raw vertex bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Number of triangles emitted by [`SphereMesh::triangle_indices`].
    pub fn triangle_count(&self) -> usize {
        let s = self.slices as usize;
        2 * s + 2 * s * (self.sections as usize - 2)
    }

    /// Indexed triangle list: a fan around each pole and a quad strip
    /// between each pair of adjacent rings.
    pub fn triangle_indices(&self, winding: Winding) -> Vec<u32> {
        let s = self.slices;
        let rings = self.sections - 1;
        let last = self.vertices.len() as u32 - 1;
        let mut indices = Vec::with_capacity(self.triangle_count() * 3);

        let mut push = |a: u32, b: u32, c: u32| match winding {
            Winding::CounterClockwise => indices.extend_from_slice(&[a, b, c]),
            Winding::Clockwise => indices.extend_from_slice(&[a, c, b]),
        };

        for i in 0..s {
            push(0, 1 + i, 1 + (i + 1) % s);
        }

        for ring in 0..rings - 1 {
            let upper = 1 + ring * s;
            let lower = upper + s;
            for i in 0..s {
                let next = (i + 1) % s;
                let (a, b) = (upper + i, lower + i);
                let (c, d) = (upper + next, lower + next);
                push(a, b, c);
                push(c, b, d);
            }
        }

        let bottom_ring = 1 + (rings - 1) * s;
        for i in 0..s {
            push(last, bottom_ring + (i + 1) % s, bottom_ring + i);
        }

        indices
    }
}
