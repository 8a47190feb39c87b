//! Per-vertex in-scattering evaluation.
//!
//! A view ray from the camera to the shaded point is marched in a fixed number
//! of segments. At each segment midpoint the optical depth table supplies the
//! depth toward the sun and toward the camera; the attenuated densities are
//! summed and scaled by the Rayleigh and Mie phase functions.

use glam::{DVec3, Vec3};

use crate::depth_table::{OpticalDepthTable, angle_coordinate};
use crate::error::ScatterError;
use crate::params::{DELTA, ScatterConstants, ScatteringParameters};

/// Returned when the ray through the atmosphere has no length.
pub const BLACK: [f32; 3] = [0.0; 3];

/// How the camera-side optical depth combines with a sample's depth.
///
/// Table depths always run from a point outward to space, so the depth
/// between the camera and a sample is the difference of two lookups. Which
/// lookup is subtracted from which depends on whether the camera sits above
/// the shaded point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthCombine {
    /// Look back along the ray toward the camera; sample minus camera.
    CameraAbove,
    /// Look forward along the ray; camera minus sample.
    CameraBelow,
}

impl DepthCombine {
    /// Direction whose table lookup passes through the camera.
    #[inline]
    pub fn lookup_direction(self, ray: Vec3) -> Vec3 {
        match self {
            Self::CameraAbove => -ray,
            Self::CameraBelow => ray,
        }
    }

    /// Optical depth between the camera and the sample.
    #[inline]
    pub fn combine(self, sample_depth: f32, camera_depth: f32) -> f32 {
        match self {
            Self::CameraAbove => sample_depth - camera_depth,
            Self::CameraBelow => camera_depth - sample_depth,
        }
    }
}

/// Rayleigh phase function, unnormalized: `0.75 (1 + cos²θ)`.
#[inline]
pub fn rayleigh_phase(cos_angle: f32) -> f32 {
    0.75 * (1.0 + cos_angle * cos_angle)
}

/// Henyey-Greenstein (Cornette-Shanks form) Mie phase function.
#[inline]
pub fn mie_phase(cos_angle: f32, g: f32) -> f32 {
    let g2 = g * g;
    let cos2 = cos_angle * cos_angle;
    1.5 * ((1.0 - g2) / (2.0 + g2)) * (1.0 + cos2) / (1.0 + g2 - 2.0 * g * cos_angle).powf(1.5)
}

/// Scattered color of `point` seen from `camera` with the sun along `light_dir`.
///
/// `light_dir` must be unit length and point toward the sun. Every channel of
/// the result lies in `[0, 1]`. A camera that coincides with `point` yields
/// [`BLACK`].
pub fn shade(
    point: Vec3,
    camera: Vec3,
    light_dir: Vec3,
    constants: &ScatterConstants,
    table: &OpticalDepthTable,
) -> [f32; 3] {
    let to_point = point - camera;
    let mut far = to_point.length();
    if !(far > DELTA) {
        return BLACK;
    }
    let ray = to_point / far;

    let inner = constants.inner_radius;
    let outer = constants.outer_radius;
    let scale = constants.scale;

    // Near intersection with the outer sphere; a grazing ray has a zero discriminant.
    let b = 2.0 * camera.dot(ray);
    let c = camera.dot(camera) - outer * outer;
    let det = (b * b - 4.0 * c).max(0.0);
    let near = 0.5 * (-b - det.sqrt());

    let mut origin = camera;
    let mut camera_depth = [0.0_f32; 4];
    let combine = if near <= 0.0 {
        let height = camera.length();
        let combine = if height >= point.length() {
            DepthCombine::CameraAbove
        } else {
            DepthCombine::CameraBelow
        };
        let altitude = (height - inner) * scale;
        let cos = combine.lookup_direction(ray).dot(camera) / height;
        table.interpolate(&mut camera_depth, altitude, angle_coordinate(cos));
        combine
    } else {
        origin += ray * near;
        far -= near;
        DepthCombine::CameraAbove
    };

    if far <= DELTA {
        return BLACK;
    }

    let samples = constants.samples.max(1);
    let sample_length = far / samples as f32;
    let scaled_length = sample_length * scale;
    let sample_ray = ray * sample_length;
    let view_dir = combine.lookup_direction(ray);
    let inv_w4 = Vec3::from(constants.inv_wavelength4);

    let mut rayleigh_sum = Vec3::ZERO;
    let mut mie_sum = Vec3::ZERO;
    let mut light_depth = [0.0_f32; 4];
    let mut sample_depth = [0.0_f32; 4];

    for i in 0..samples {
        let pos = origin + sample_ray * (i as f32 + 0.5);
        let height = pos.length();
        let altitude = (height - inner) * scale;

        table.interpolate(
            &mut light_depth,
            altitude,
            angle_coordinate(light_dir.dot(pos) / height),
        );
        // No sunlight reaches this sample.
        if light_depth[0] < DELTA {
            continue;
        }

        let rayleigh_density = scaled_length * light_depth[0];
        let mie_density = scaled_length * light_depth[2];

        table.interpolate(
            &mut sample_depth,
            altitude,
            angle_coordinate(view_dir.dot(pos) / height),
        );
        let view_rayleigh = combine.combine(sample_depth[1], camera_depth[1]).max(0.0);
        let view_mie = combine.combine(sample_depth[3], camera_depth[3]).max(0.0);

        let rayleigh_depth = (light_depth[1] + view_rayleigh) * constants.kr_4pi;
        let mie_depth = (light_depth[3] + view_mie) * constants.km_4pi;

        let tau = inv_w4 * rayleigh_depth + Vec3::splat(mie_depth);
        let attenuation = Vec3::new((-tau.x).exp(), (-tau.y).exp(), (-tau.z).exp());

        rayleigh_sum += attenuation * rayleigh_density;
        mie_sum += attenuation * mie_density;
    }

    let cos_angle = (-ray).dot(light_dir);
    let phase_r = rayleigh_phase(cos_angle) * constants.kr * constants.e_sun;
    let phase_m = mie_phase(cos_angle, constants.g) * constants.km * constants.e_sun;

    let color = rayleigh_sum * inv_w4 * phase_r + mie_sum * phase_m;
    [
        clamp_channel(color.x),
        clamp_channel(color.y),
        clamp_channel(color.z),
    ]
}

#[inline]
fn clamp_channel(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Validated camera/light snapshot for one frame of shading.
#[derive(Clone, Copy, Debug)]
pub struct ShadeFrame {
    camera: Vec3,
    light_dir: Vec3,
    constants: ScatterConstants,
}

impl ShadeFrame {
    /// Snapshot the parameters and normalize the light direction.
    ///
    /// The camera is demoted from `f64` here, once per frame.
    pub fn new(
        camera: DVec3,
        light: Vec3,
        params: &ScatteringParameters,
    ) -> Result<Self, ScatterError> {
        if !camera.is_finite() {
            return Err(ScatterError::InvalidCamera);
        }
        let light_dir = light
            .try_normalize()
            .ok_or(ScatterError::InvalidLightDirection)?;
        Ok(Self {
            camera: camera.as_vec3(),
            light_dir,
            constants: params.constants()?,
        })
    }

    /// Camera position in working precision.
    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    /// Unit vector toward the sun.
    pub fn light_dir(&self) -> Vec3 {
        self.light_dir
    }

    /// Frozen scattering constants.
    pub fn constants(&self) -> &ScatterConstants {
        &self.constants
    }

    /// Whether `point` faces the camera (`camera · point > 0`).
    #[inline]
    pub fn faces_camera(&self, point: Vec3) -> bool {
        self.camera.dot(point) > 0.0
    }

    /// [`shade`] with this frame's camera, light and constants.
    #[inline]
    pub fn shade(&self, point: Vec3, table: &OpticalDepthTable) -> [f32; 3] {
        shade(point, self.camera, self.light_dir, &self.constants, table)
    }
}
