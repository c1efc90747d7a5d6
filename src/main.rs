use anyhow::Result;
use log::{debug, info};
use std::time::Duration;

use sinkhole::core::math::lerp;
use sinkhole::engine::game_loop::GameLoop;
use sinkhole::game::{Scene, SceneConfig};

const VIEWPORT: (f32, f32) = (1280.0, 720.0);

/// Simulated frame time (60 FPS)
const FRAME_TIME: Duration = Duration::from_micros(16_667);

/// Length of the scripted run, in frames
const DEMO_FRAMES: u32 = 900;

/// Pointer waypoints in pixels, visited in a loop
const POINTER_PATH: [(f32, f32); 5] = [
    (640.0, 360.0),
    (420.0, 300.0),
    (860.0, 300.0),
    (860.0, 460.0),
    (420.0, 460.0),
];

/// Pointer position `frame` frames into the sweep
fn pointer_at(frame: u32) -> (f32, f32) {
    let progress = frame as f32 / DEMO_FRAMES as f32 * POINTER_PATH.len() as f32;
    let from = progress.floor() as usize % POINTER_PATH.len();
    let to = (from + 1) % POINTER_PATH.len();
    let t = progress.fract();

    (
        lerp(POINTER_PATH[from].0, POINTER_PATH[to].0, t),
        lerp(POINTER_PATH[from].1, POINTER_PATH[to].1, t),
    )
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Sinkhole...");

    let config = SceneConfig::default();
    let mut game_loop = GameLoop::new(Duration::from_secs_f32(config.max_frame_delta));
    let mut scene = Scene::new(config)?;
    scene.resize(VIEWPORT.0, VIEWPORT.1);

    let mut total_pulls = 0;
    for frame in 0..DEMO_FRAMES {
        let (x, y) = pointer_at(frame);
        scene.pointer_moved(x, y);

        let dt = game_loop.advance(FRAME_TIME);
        let report = scene.tick(dt);
        total_pulls += report.pulled;

        if report.tick % 60 == 0 {
            debug!(
                "t={:.1}s hole at {:?}, {} crates left, {} sensor events this tick",
                game_loop.simulated_secs(),
                scene.hole_position(),
                scene.crates().len(),
                report.sensor_events
            );
        }
    }

    info!(
        "Done after {} frames ({:.1}s simulated, {:.0} FPS): {} pulls, {} crates swallowed, {} left",
        game_loop.frame_count(),
        game_loop.simulated_secs(),
        game_loop.fps(),
        total_pulls,
        scene.despawned_total(),
        scene.crates().len()
    );

    Ok(())
}
