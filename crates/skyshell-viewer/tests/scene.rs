use skyshell_config::Config;
use skyshell_viewer::{AtmosphereScene, DemoPilot, FrameInput, FrameStats, write_table_png};

fn small_config() -> Config {
    let mut config = Config::default();
    config.planet.table_altitude_cells = 64;
    config.planet.table_angle_cells = 32;
    config.planet.table_integration_steps = 25;
    config.planet.inner_slices = 20;
    config.planet.inner_sections = 12;
    config.planet.outer_slices = 24;
    config.planet.outer_sections = 16;
    config
}

fn colors(scene: &AtmosphereScene) -> Vec<[f32; 4]> {
    scene
        .planet()
        .vertices()
        .iter()
        .chain(scene.sky().vertices())
        .map(|v| v.color)
        .collect()
}

#[test]
fn test_parallel_shading_matches_sequential() {
    let config = small_config();
    let mut sequential = AtmosphereScene::from_config(&config).unwrap();
    let mut parallel = AtmosphereScene::from_config(&config).unwrap();
    parallel.set_parallel_shading(true);

    let mut pilot_a = DemoPilot::new();
    let mut pilot_b = DemoPilot::new();
    for _ in 0..30 {
        let a = sequential.advance(&pilot_a.next_input(), 1.0 / 60.0).unwrap();
        let b = parallel.advance(&pilot_b.next_input(), 1.0 / 60.0).unwrap();
        assert_eq!(a, b);
    }
    assert_eq!(colors(&sequential), colors(&parallel));
}

#[test]
fn test_scripted_flight_stays_valid() {
    let mut scene = AtmosphereScene::from_config(&small_config()).unwrap();
    let mut pilot = DemoPilot::new();
    let inner = f64::from(small_config().planet.inner_radius);

    for _ in 0..600 {
        scene.advance(&pilot.next_input(), 1.0 / 60.0).unwrap();
        assert!(scene.camera().position().length() >= inner);
    }

    for color in colors(&scene) {
        assert_eq!(color[3], 1.0);
        for c in &color[..3] {
            assert!((0.0..=1.0).contains(c), "channel out of range: {color:?}");
        }
    }
    assert!(scene.params().samples > 5);
}

#[test]
fn test_lit_hemisphere_gets_color() {
    let mut scene = AtmosphereScene::from_config(&small_config()).unwrap();
    scene.advance(&FrameInput::default(), 1.0 / 60.0).unwrap();
    let brightest = scene
        .planet()
        .vertices()
        .iter()
        .map(|v| v.color[0] + v.color[1] + v.color[2])
        .fold(0.0_f32, f32::max);
    assert!(brightest > 0.0);
}

#[test]
fn test_config_round_trip_drives_scene() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config();
    config.scattering.samples = 3;
    config.render.parallel_shading = true;
    config.save(dir.path()).unwrap();

    let loaded = Config::load_or_create(dir.path()).unwrap();
    let mut scene = AtmosphereScene::from_config(&loaded).unwrap();
    scene.advance(&FrameInput::default(), loaded.render.frame_seconds).unwrap();
    let status = scene.status_lines(60.0);
    assert_eq!(status[0], "60.00 FPS");
    assert_eq!(status[1], "Samples: 3");
    assert_eq!(status.len(), 9);
}

#[test]
fn test_dump_table_and_count_frames() {
    let dir = tempfile::tempdir().unwrap();
    let scene = AtmosphereScene::from_config(&small_config()).unwrap();
    let path = dir.path().join("depth.png");
    write_table_png(scene.table(), &path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);

    let mut stats = FrameStats::new();
    let published = (0..120).filter_map(|_| stats.record_frame(1.0 / 60.0)).count();
    assert!(published >= 1);
    assert_eq!(stats.total_frames(), 120);
}
