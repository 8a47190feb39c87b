//! The atmosphere scene and its per-frame update.

use glam::{DVec3, Vec3};
use rayon::prelude::*;
use skyshell_camera::{CameraState, FlightController, FlightInput};
use skyshell_config::Config;
use skyshell_mesh::{SphereMesh, SphereVertex, Winding};
use skyshell_scatter::{
    ColorChannel, Nudge, OpticalDepthTable, PlanetShape, ScatterTunable, ScatteringParameters,
    ShadeFrame, TableResolution,
};
use tracing::info;

use crate::error::ViewerError;

/// Input gathered for a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub flight: FlightInput,
    /// Tunable adjustments applied before the camera moves.
    pub nudges: Vec<(ScatterTunable, Nudge)>,
}

/// What one call to [`AtmosphereScene::advance`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Vertices whose color was recomputed.
    pub shaded: usize,
    /// Vertices skipped as facing away from the camera.
    pub skipped: usize,
    /// Whether the camera bounced off the planet.
    pub bounced: bool,
}

impl std::ops::AddAssign for FrameReport {
    fn add_assign(&mut self, rhs: Self) {
        self.shaded += rhs.shaded;
        self.skipped += rhs.skipped;
        self.bounced |= rhs.bounced;
    }
}

/// Planet, atmosphere shell, camera and scattering state.
pub struct AtmosphereScene {
    params: ScatteringParameters,
    table: OpticalDepthTable,
    planet: SphereMesh,
    sky: SphereMesh,
    planet_indices: Vec<u32>,
    sky_indices: Vec<u32>,
    camera: CameraState,
    flight: FlightController,
    light: Vec3,
    parallel_shading: bool,
    cull_back_hemisphere: bool,
}

impl AtmosphereScene {
    /// Build every scene resource described by `config`.
    ///
    /// Fails if the geometry, tunables, light or tessellation are invalid.
    pub fn from_config(config: &Config) -> Result<Self, ViewerError> {
        let planet_cfg = &config.planet;
        let shape = PlanetShape {
            inner_radius: planet_cfg.inner_radius,
            outer_radius: planet_cfg.outer_radius,
            rayleigh_scale_height: planet_cfg.rayleigh_scale_height,
            mie_scale_height: planet_cfg.mie_scale_height,
        };

        let scattering = &config.scattering;
        let mut params = ScatteringParameters::new(shape);
        params.samples = scattering.samples;
        params.rayleigh = scattering.rayleigh;
        params.mie = scattering.mie;
        params.sun_brightness = scattering.sun_brightness;
        params.asymmetry = scattering.asymmetry;
        for channel in ColorChannel::ALL {
            params.set_wavelength(channel, scattering.wavelengths[channel.index()]);
        }

        let camera = CameraState::new(DVec3::from_array(config.camera.start_position));
        let light = Vec3::from_array(scattering.light_position);
        // Validates the tunables, light and camera before any heavy work.
        ShadeFrame::new(camera.position(), light, &params)?;

        let table = OpticalDepthTable::build(
            &shape,
            TableResolution {
                altitude: planet_cfg.table_altitude_cells,
                angle: planet_cfg.table_angle_cells,
                integration_steps: planet_cfg.table_integration_steps,
            },
        )?;

        let planet = SphereMesh::generate(
            shape.inner_radius,
            planet_cfg.inner_slices,
            planet_cfg.inner_sections,
        )?;
        let sky = SphereMesh::generate(
            shape.outer_radius,
            planet_cfg.outer_slices,
            planet_cfg.outer_sections,
        )?;
        let planet_indices = planet.triangle_indices(Winding::CounterClockwise);
        let sky_indices = sky.triangle_indices(Winding::Clockwise);

        info!(
            planet_vertices = planet.vertices().len(),
            sky_vertices = sky.vertices().len(),
            parallel = config.render.parallel_shading,
            "atmosphere scene ready"
        );

        let camera_cfg = &config.camera;
        Ok(Self {
            params,
            table,
            planet,
            sky,
            planet_indices,
            sky_indices,
            camera,
            flight: FlightController {
                thrust: camera_cfg.thrust,
                boost_multiplier: camera_cfg.boost_multiplier,
                damping: camera_cfg.damping,
                rotate_speed: camera_cfg.rotate_speed,
                inner_radius: f64::from(shape.inner_radius),
            },
            light,
            parallel_shading: config.render.parallel_shading,
            cull_back_hemisphere: config.render.cull_back_hemisphere,
        })
    }

    /// Run one frame: apply tunable nudges, move the camera, freeze the
    /// scattering constants and recolor both spheres.
    pub fn advance(&mut self, input: &FrameInput, dt: f64) -> Result<FrameReport, ViewerError> {
        for &(tunable, nudge) in &input.nudges {
            self.params.nudge(tunable, nudge);
        }
        let bounced = self.flight.step(&mut self.camera, &input.flight, dt);

        let mut report = self.shade()?;
        report.bounced = bounced;
        Ok(report)
    }

    /// Recolor both spheres for the current camera and tunables.
    pub fn shade(&mut self) -> Result<FrameReport, ViewerError> {
        let frame = ShadeFrame::new(self.camera.position(), self.light, &self.params)?;
        let mut report = shade_mesh(
            &mut self.planet,
            &frame,
            &self.table,
            self.parallel_shading,
            self.cull_back_hemisphere,
        );
        report += shade_mesh(
            &mut self.sky,
            &frame,
            &self.table,
            self.parallel_shading,
            self.cull_back_hemisphere,
        );
        Ok(report)
    }

    /// Overlay text for the current tunables.
    pub fn status_lines(&self, fps: f64) -> Vec<String> {
        self.params.status_lines(fps)
    }

    pub fn params(&self) -> &ScatteringParameters {
        &self.params
    }

    pub fn table(&self) -> &OpticalDepthTable {
        &self.table
    }

    pub fn planet(&self) -> &SphereMesh {
        &self.planet
    }

    pub fn sky(&self) -> &SphereMesh {
        &self.sky
    }

    /// Planet surface triangles, outward facing.
    pub fn planet_indices(&self) -> &[u32] {
        &self.planet_indices
    }

    /// Atmosphere shell triangles, inward facing.
    pub fn sky_indices(&self) -> &[u32] {
        &self.sky_indices
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraState {
        &mut self.camera
    }

    pub fn set_parallel_shading(&mut self, parallel: bool) {
        self.parallel_shading = parallel;
    }
}

fn shade_mesh(
    mesh: &mut SphereMesh,
    frame: &ShadeFrame,
    table: &OpticalDepthTable,
    parallel: bool,
    cull: bool,
) -> FrameReport {
    let shade_vertex = |vertex: &mut SphereVertex| -> usize {
        let point = vertex.position();
        if cull && !frame.faces_camera(point) {
            return 0;
        }
        vertex.set_rgb(frame.shade(point, table));
        1
    };

    let vertices = mesh.vertices_mut();
    let total = vertices.len();
    let shaded: usize = if parallel {
        vertices.par_iter_mut().map(shade_vertex).sum()
    } else {
        vertices.iter_mut().map(shade_vertex).sum()
    };

    FrameReport {
        shaded,
        skipped: total - shaded,
        bounced: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.planet.table_altitude_cells = 32;
        config.planet.table_angle_cells = 32;
        config.planet.table_integration_steps = 20;
        config.planet.inner_slices = 12;
        config.planet.inner_sections = 8;
        config.planet.outer_slices = 16;
        config.planet.outer_sections = 10;
        config
    }

    #[test]
    fn test_scene_builds_from_defaults_with_small_resources() {
        let scene = AtmosphereScene::from_config(&small_config()).unwrap();
        assert_eq!(scene.planet().vertices().len(), 12 * 7 + 2);
        assert_eq!(scene.sky().vertices().len(), 16 * 9 + 2);
        assert_eq!(scene.camera().position(), DVec3::new(0.0, 0.0, 25.0));
        assert_eq!(scene.params().samples, 5);
        assert_eq!(scene.planet_indices().len(), scene.planet().triangle_count() * 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.planet.outer_radius = 9.0;
        assert!(matches!(
            AtmosphereScene::from_config(&config),
            Err(ViewerError::Scatter(_))
        ));

        let mut config = small_config();
        config.scattering.light_position = [0.0; 3];
        assert!(AtmosphereScene::from_config(&config).is_err());

        let mut config = small_config();
        config.planet.inner_slices = 2;
        assert!(matches!(
            AtmosphereScene::from_config(&config),
            Err(ViewerError::Mesh(_))
        ));
    }

    #[test]
    fn test_advance_counts_every_vertex_once() {
        let mut scene = AtmosphereScene::from_config(&small_config()).unwrap();
        let report = scene.advance(&FrameInput::default(), 1.0 / 60.0).unwrap();
        let total = scene.planet().vertices().len() + scene.sky().vertices().len();
        assert_eq!(report.shaded + report.skipped, total);
        assert!(report.shaded > 0);
        assert!(report.skipped > 0);
        assert!(!report.bounced);
    }

    #[test]
    fn test_culled_vertices_keep_initial_color() {
        let mut scene = AtmosphereScene::from_config(&small_config()).unwrap();
        scene.advance(&FrameInput::default(), 1.0 / 60.0).unwrap();
        let south_pole = scene.planet().vertices().last().unwrap();
        assert_eq!(south_pole.color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_nudges_apply_before_shading() {
        let mut scene = AtmosphereScene::from_config(&small_config()).unwrap();
        let input = FrameInput {
            nudges: vec![
                (ScatterTunable::Samples, Nudge::Increase),
                (ScatterTunable::Wavelength(ColorChannel::Blue), Nudge::Decrease),
            ],
            ..Default::default()
        };
        scene.advance(&input, 1.0 / 60.0).unwrap();
        assert_eq!(scene.params().samples, 6);
        assert!((scene.params().wavelengths()[2] - 0.474).abs() < 1e-6);
    }
}
