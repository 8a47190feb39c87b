//! Configuration structs with defaults matching the reference scene, plus RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";
const APP_NAME: &str = "skyshell";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Planet and atmosphere geometry, lookup table and mesh resolution.
    pub planet: PlanetConfig,
    /// Initial values of the runtime scattering tunables.
    pub scattering: ScatteringConfig,
    /// Camera start pose and flight model.
    pub camera: CameraConfig,
    /// Frame loop settings.
    pub render: RenderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Planet and atmosphere shell geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Planet surface radius.
    pub inner_radius: f32,
    /// Top of the atmosphere.
    pub outer_radius: f32,
    /// Rayleigh scale height as a fraction of the atmosphere thickness.
    pub rayleigh_scale_height: f32,
    /// Mie scale height as a fraction of the atmosphere thickness.
    pub mie_scale_height: f32,
    /// Optical depth table cells along the altitude axis.
    pub table_altitude_cells: usize,
    /// Optical depth table cells along the angle axis.
    pub table_angle_cells: usize,
    /// Integration steps per optical depth ray.
    pub table_integration_steps: usize,
    /// Longitudinal slices of the planet sphere.
    pub inner_slices: u32,
    /// Latitudinal sections of the planet sphere.
    pub inner_sections: u32,
    /// Longitudinal slices of the atmosphere shell.
    pub outer_slices: u32,
    /// Latitudinal sections of the atmosphere shell.
    pub outer_sections: u32,
}

/// Starting values for the scattering tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScatteringConfig {
    /// Ray-march samples per shaded vertex.
    pub samples: u32,
    /// Rayleigh scattering constant (Kr).
    pub rayleigh: f32,
    /// Mie scattering constant (Km).
    pub mie: f32,
    /// Sun brightness (ESun).
    pub sun_brightness: f32,
    /// Mie phase asymmetry factor g.
    pub asymmetry: f32,
    /// Red, green and blue wavelengths in micrometres.
    pub wavelengths: [f32; 3],
    /// Light position; the light direction is this vector normalized.
    pub light_position: [f32; 3],
}

/// Camera start pose and flight model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting camera position.
    pub start_position: [f64; 3],
    /// Thruster acceleration in units/s².
    pub thrust: f64,
    /// Thrust multiplier while boosting.
    pub boost_multiplier: f64,
    /// Velocity damping factor per second.
    pub damping: f64,
    /// Rotation rate in radians per second at full stick.
    pub rotate_speed: f64,
}

/// Frame loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Shade vertices across the rayon thread pool.
    pub parallel_shading: bool,
    /// Skip vertices on the hemisphere facing away from the camera.
    pub cull_back_hemisphere: bool,
    /// Frames the headless viewer runs before exiting.
    pub frames: u32,
    /// Simulated seconds per frame.
    pub frame_seconds: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log the parameter status block every time the FPS counter updates.
    pub show_status: bool,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            inner_radius: 10.0,
            outer_radius: 10.15,
            rayleigh_scale_height: 0.25,
            mie_scale_height: 0.1,
            table_altitude_cells: 256,
            table_angle_cells: 128,
            table_integration_steps: 50,
            inner_slices: 50,
            inner_sections: 50,
            outer_slices: 100,
            outer_sections: 100,
        }
    }
}

impl Default for ScatteringConfig {
    fn default() -> Self {
        Self {
            samples: 5,
            rayleigh: 0.0025,
            mie: 0.0025,
            sun_brightness: 15.0,
            asymmetry: -0.75,
            wavelengths: [0.650, 0.570, 0.475],
            light_position: [1000.0, 1000.0, 1000.0],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 0.0, 25.0],
            thrust: 1.0,
            boost_multiplier: 10.0,
            damping: 0.1,
            rotate_speed: 1.0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            parallel_shading: false,
            cull_back_hemisphere: true,
            frames: 600,
            frame_seconds: 1.0 / 60.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_status: true,
        }
    }
}

/// The per-user config directory, e.g. `~/.config/skyshell` on Linux.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = Config::default();
        assert_eq!(config.planet.inner_radius, 10.0);
        assert_eq!(config.planet.outer_radius, 10.15);
        assert_eq!(config.scattering.samples, 5);
        assert_eq!(config.scattering.asymmetry, -0.75);
        assert_eq!(config.camera.start_position, [0.0, 0.0, 25.0]);
        assert!(config.render.cull_back_hemisphere);
    }

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("inner_radius: 10.0"));
        assert!(ron_str.contains("samples: 5"));
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(planet: (), render: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.scattering, ScatteringConfig::default());
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_fields() {
        let ron_str = "(scattering: (samples: 12, asymmetry: -0.9))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.scattering.samples, 12);
        assert_eq!(config.scattering.asymmetry, -0.9);
        assert_eq!(config.scattering.sun_brightness, 15.0);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.planet.outer_radius = 10.25;
        config.scattering.wavelengths = [0.7, 0.55, 0.44];
        config.render.parallel_shading = true;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.scattering.sun_brightness = 20.0;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap();
        assert_eq!(reloaded.unwrap().scattering.sun_brightness, 20.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
