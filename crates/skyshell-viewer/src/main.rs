//! Headless skyshell viewer: flies a scripted path around the planet and
//! reports frame rate and scattering settings.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use skyshell_config::CliArgs;
use skyshell_viewer::{
    AtmosphereScene, DemoPilot, FrameStats, Startup, ViewerError, start, write_table_png,
};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "skyshell viewer stopped");
            eprintln!("skyshell: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), ViewerError> {
    let Startup { config, .. } = start(args, std::io::stdout, cfg!(debug_assertions))?;

    let mut scene = AtmosphereScene::from_config(&config)?;
    if let Some(path) = &args.dump_table {
        write_table_png(scene.table(), path)?;
    }

    let mut pilot = DemoPilot::new();
    let mut stats = FrameStats::new();
    let dt = config.render.frame_seconds;
    let mut last = Instant::now();

    for frame in 0..config.render.frames {
        let report = scene.advance(&pilot.next_input(), dt)?;

        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f64();
        last = now;

        if let Some(fps) = stats.record_frame(elapsed) {
            let height = scene.camera().position().length();
            info!(
                frame,
                fps,
                shaded = report.shaded,
                skipped = report.skipped,
                height,
                "frame stats"
            );
            if config.debug.show_status {
                for line in scene.status_lines(fps) {
                    info!("{line}");
                }
            }
        }
    }

    info!(
        frames = stats.total_frames(),
        last_fps = stats.fps(),
        params = %scene.params(),
        "skyshell viewer finished"
    );
    Ok(())
}
