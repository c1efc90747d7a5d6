// Scene configuration

use glam::Vec3;

use super::SceneError;

/// Everything needed to build the demo scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub gravity: Vec3,

    /// Full size of the floor slab
    pub ground_size: Vec3,
    /// Center of the floor slab; its top face sits at y = 0 by default
    pub ground_position: Vec3,

    /// Number of boxes dropped at startup
    pub box_count: usize,
    /// Full size of each box
    pub box_size: Vec3,
    /// Boxes spawn with x and z in -extent..extent
    pub spawn_half_extent: f32,
    /// Boxes spawn with y in min..max
    pub spawn_height: (f32, f32),
    /// RNG seed for spawn positions, `None` for a different layout every run
    pub seed: Option<u64>,

    /// Horizontal reach of the sinkhole
    pub hole_radius: f32,
    /// Vertical reach of the sinkhole
    pub hole_height: f32,
    /// Starting position; pointer moves keep its y
    pub hole_position: Vec3,
    /// Distance an overlapping box is pulled down per tick
    pub pull_step: f32,

    /// Largest simulation step in seconds
    pub max_frame_delta: f32,
    /// Boxes below this height are removed from the simulation
    pub kill_plane_y: f32,

    pub camera_position: Vec3,
    pub camera_target: Vec3,
    /// Vertical field of view in degrees
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            ground_size: Vec3::new(40.0, 0.2, 40.0),
            ground_position: Vec3::new(0.0, -0.1, 0.0),
            box_count: 30,
            box_size: Vec3::ONE,
            spawn_half_extent: 6.0,
            spawn_height: (4.0, 10.0),
            seed: None,
            hole_radius: 2.0,
            hole_height: 2.0,
            hole_position: Vec3::new(0.0, 0.5, 0.0),
            pull_step: 0.05,
            max_frame_delta: 1.0 / 30.0,
            kill_plane_y: -10.0,
            camera_position: Vec3::new(8.0, 10.0, 14.0),
            camera_target: Vec3::ZERO,
            camera_fov: 60.0,
            camera_near: 0.1,
            camera_far: 200.0,
        }
    }
}

impl SceneConfig {
    /// Use a fixed spawn layout
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of boxes dropped at startup
    pub fn with_box_count(mut self, box_count: usize) -> Self {
        self.box_count = box_count;
        self
    }

    /// Set the sinkhole's reach
    pub fn with_hole_size(mut self, radius: f32, height: f32) -> Self {
        self.hole_radius = radius;
        self.hole_height = height;
        self
    }

    /// Set where the sinkhole starts
    pub fn with_hole_position(mut self, position: Vec3) -> Self {
        self.hole_position = position;
        self
    }

    /// Set how far overlapping boxes are pulled per tick
    pub fn with_pull_step(mut self, step: f32) -> Self {
        self.pull_step = step;
        self
    }

    /// Check that the values describe a buildable scene
    pub fn validate(&self) -> Result<(), SceneError> {
        if !positive(self.hole_radius) || !positive(self.hole_height) {
            return Err(SceneError::InvalidSinkhole {
                radius: self.hole_radius,
                height: self.hole_height,
            });
        }

        if !self.pull_step.is_finite() || self.pull_step < 0.0 {
            return Err(SceneError::InvalidPullStep(self.pull_step));
        }

        for (name, size) in [("ground", self.ground_size), ("box", self.box_size)] {
            if !size.to_array().into_iter().all(positive) {
                return Err(SceneError::InvalidSize {
                    name,
                    size: size.to_array(),
                });
            }
        }

        if !positive(self.spawn_half_extent) {
            return Err(SceneError::InvalidSpawnArea(self.spawn_half_extent));
        }

        let (min, max) = self.spawn_height;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(SceneError::InvalidSpawnHeight { min, max });
        }

        if !positive(self.max_frame_delta) {
            return Err(SceneError::InvalidFrameDelta(self.max_frame_delta));
        }

        self.validate_camera()
    }

    fn validate_camera(&self) -> Result<(), SceneError> {
        if !(positive(self.camera_fov) && self.camera_fov < 180.0) {
            return Err(SceneError::InvalidCamera("field of view must be in 0..180 degrees"));
        }

        if !positive(self.camera_near) || !self.camera_far.is_finite() {
            return Err(SceneError::InvalidCamera("near and far must be positive"));
        }

        if self.camera_far <= self.camera_near {
            return Err(SceneError::InvalidCamera("far plane must lie beyond the near plane"));
        }

        if !self.camera_position.is_finite() || !self.camera_target.is_finite() {
            return Err(SceneError::InvalidCamera("position and target must be finite"));
        }

        // The camera is oriented with +Y up, so it can't look straight up or down
        let view = self.camera_target - self.camera_position;
        if view.length_squared() <= f32::EPSILON {
            return Err(SceneError::InvalidCamera("camera sits on its own target"));
        }
        if view.normalize().cross(Vec3::Y).length_squared() <= f32::EPSILON {
            return Err(SceneError::InvalidCamera("view direction is vertical"));
        }

        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
