// Game layer: scene configuration and the per-tick pipeline

pub mod config;
pub mod scene;

pub use config::SceneConfig;
pub use scene::{Scene, TickReport};

/// Errors raised while building a scene
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("Invalid sinkhole size: radius {radius}, height {height}")]
    InvalidSinkhole { radius: f32, height: f32 },

    #[error("Invalid pull step: {0}")]
    InvalidPullStep(f32),

    #[error("Invalid {name} size: {size:?}")]
    InvalidSize { name: &'static str, size: [f32; 3] },

    #[error("Invalid spawn area half-extent: {0}")]
    InvalidSpawnArea(f32),

    #[error("Invalid spawn height range: {min}..{max}")]
    InvalidSpawnHeight { min: f32, max: f32 },

    #[error("Invalid max frame delta: {0}s")]
    InvalidFrameDelta(f32),

    #[error("Invalid camera: {0}")]
    InvalidCamera(&'static str),
}
