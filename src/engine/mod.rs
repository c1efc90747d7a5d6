// Engine modules: physics, camera, input, frame pacing

pub mod camera;
pub mod game_loop;
pub mod input;
pub mod physics;
