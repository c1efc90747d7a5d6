// The demo scene: floor, falling boxes and the pointer-driven sinkhole

use glam::Vec3;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{SceneConfig, SceneError};
use crate::engine::camera::Camera;
use crate::engine::input::{GroundPicker, PointerState};
use crate::engine::physics::{
    presets, BodyKind, BodyRegistry, OverlapTrigger, PhysicsWorld, RigidBodyHandle, Sink,
    TriggerVolume,
};

/// Pointer hits farther than this from the camera are ignored
const MAX_PICK_DISTANCE: f32 = 1000.0;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Boxes the sinkhole pulled this tick
    pub pulled: usize,
    /// Boxes removed for falling below the kill plane
    pub despawned: usize,
    /// Sensor intersection events reported by the physics engine
    pub sensor_events: usize,
}

/// Owns the physics world and drives the tick pipeline
pub struct Scene {
    config: SceneConfig,
    world: PhysicsWorld,
    registry: BodyRegistry,
    hole: OverlapTrigger,
    camera: Camera,
    pointer: PointerState,
    picker: GroundPicker,
    crates: Vec<RigidBodyHandle>,
    tick_count: u64,
    despawned_total: usize,
}

impl Scene {
    /// Build the scene, seeding spawn positions from the config
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Build the scene with a caller-supplied RNG for spawn positions
    pub fn with_rng<R: Rng>(config: SceneConfig, rng: &mut R) -> Result<Self, SceneError> {
        config.validate()?;

        let mut world = PhysicsWorld::with_gravity(config.gravity);
        world.add_body(
            presets::ground_body(config.ground_position),
            presets::ground_collider(config.ground_size),
        );

        let mut registry = BodyRegistry::new();
        let hole_body = world.add_body(
            presets::sinkhole_body(config.hole_position),
            presets::sinkhole_collider(config.hole_radius, config.hole_height),
        );
        registry.register(hole_body, BodyKind::Trigger);

        let hole = OverlapTrigger::new(
            hole_body,
            TriggerVolume::new(config.hole_radius, config.hole_height),
            config.hole_position,
            Sink::new(config.pull_step),
        );

        let camera = Camera::new(
            config.camera_position,
            config.camera_target,
            config.camera_fov,
            config.camera_near,
            config.camera_far,
        );

        // Pointer positions are projected onto the top face of the floor
        let floor_y = config.ground_position.y + config.ground_size.y / 2.0;

        let mut scene = Self {
            world,
            registry,
            hole,
            camera,
            pointer: PointerState::new(1.0, 1.0),
            picker: GroundPicker::new(floor_y, MAX_PICK_DISTANCE),
            crates: Vec::with_capacity(config.box_count),
            tick_count: 0,
            despawned_total: 0,
            config,
        };

        let extent = scene.config.spawn_half_extent;
        let (min_y, max_y) = scene.config.spawn_height;
        for _ in 0..scene.config.box_count {
            let position = Vec3::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(min_y..max_y),
                rng.gen_range(-extent..extent),
            );
            scene.spawn_crate(position);
        }

        info!(
            "Scene ready: {} crates, sinkhole radius {} height {} at {:?}",
            scene.crates.len(),
            scene.config.hole_radius,
            scene.config.hole_height,
            scene.config.hole_position
        );

        Ok(scene)
    }

    /// Drop a box at `position`
    pub fn spawn_crate(&mut self, position: Vec3) -> RigidBodyHandle {
        let handle = self.world.add_body(
            presets::crate_body(position),
            presets::crate_collider(self.config.box_size),
        );
        self.registry.register(handle, BodyKind::Dynamic);
        self.crates.push(handle);
        handle
    }

    /// Track the viewport size used to interpret pointer positions
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
        self.pointer.resize(width, height);
        debug!("Viewport resized to {}x{}", width, height);
    }

    /// Handle a pointer move in pixels; the sinkhole follows the floor point under it
    ///
    /// Returns the new sinkhole target, or `None` if the pointer is not over the floor.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> Option<Vec3> {
        self.pointer.on_pointer_move(x, y);
        let ray = self.camera.ray_through(self.pointer.ndc());
        let hit = self.picker.pick(&ray)?;

        let target = Vec3::new(hit.x, self.config.hole_position.y, hit.z);
        self.hole.set_target_position(target);
        Some(target)
    }

    /// Move the sinkhole directly, bypassing the pointer
    pub fn set_hole_target(&mut self, target: Vec3) {
        self.hole.set_target_position(target);
    }

    /// Advance the scene by `dt` seconds
    ///
    /// Order within a tick:
    /// 1. forward the pending sinkhole target to its kinematic body
    /// 2. step physics (which first applies last tick's position overrides)
    /// 3. publish body positions to the registry
    /// 4. evaluate overlaps and queue the resulting overrides
    /// 5. despawn boxes below the kill plane
    pub fn tick(&mut self, dt: f32) -> TickReport {
        if let Some(target) = self.hole.pending_target() {
            self.world
                .set_next_kinematic_translation(self.hole.body(), target);
        }

        self.world.step(dt);

        for (handle, position) in self.world.positions() {
            if self.registry.contains(handle) {
                self.registry.update_position(handle, position);
            }
        }

        let overrides = self.hole.evaluate_overlaps(&self.registry);
        let pulled = overrides.len();
        self.world.queue_overrides(overrides);

        let despawned = self.despawn_below(self.config.kill_plane_y);

        let sensor_events = self
            .world
            .collision_events()
            .iter()
            .filter(|event| event.is_sensor())
            .count();

        self.tick_count += 1;
        let report = TickReport {
            tick: self.tick_count,
            pulled,
            despawned,
            sensor_events,
        };

        if pulled > 0 || despawned > 0 {
            debug!("{:?}", report);
        }

        report
    }

    fn despawn_below(&mut self, y: f32) -> usize {
        let fallen = self.registry.dynamic_below(y);
        for handle in &fallen {
            self.world.remove_rigid_body(*handle);
            self.registry.unregister(*handle);
            debug!("Crate {:?} fell out of the world", handle);
        }

        self.crates.retain(|handle| !fallen.contains(handle));
        self.despawned_total += fallen.len();
        fallen.len()
    }

    /// Live boxes
    pub fn crates(&self) -> &[RigidBodyHandle] {
        &self.crates
    }

    /// Position of a box as of the last tick
    pub fn crate_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.registry.position(handle)
    }

    /// Position the sinkhole was last evaluated at
    pub fn hole_position(&self) -> Vec3 {
        self.hole.position()
    }

    /// Boxes removed since the scene was built
    pub fn despawned_total(&self) -> usize {
        self.despawned_total
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn empty_scene() -> Scene {
        Scene::new(SceneConfig::default().with_seed(7).with_box_count(0)).unwrap()
    }

    #[test]
    fn test_spawns_configured_crates_in_bounds() {
        let scene = Scene::new(SceneConfig::default().with_seed(42)).unwrap();

        assert_eq!(scene.crates().len(), 30);
        // Crates plus the sinkhole
        assert_eq!(scene.registry().len(), 31);
        // Ground, sinkhole, crates
        assert_eq!(scene.world().body_count(), 32);

        for handle in scene.crates() {
            let p = scene.world().translation(*handle).unwrap();
            assert!(p.x >= -6.0 && p.x < 6.0);
            assert!(p.y >= 4.0 && p.y < 10.0);
            assert!(p.z >= -6.0 && p.z < 6.0);
            // Nothing published before the first tick
            assert_eq!(scene.crate_position(*handle), None);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = Scene::new(SceneConfig::default().with_seed(9).with_box_count(5)).unwrap();
        let b = Scene::new(SceneConfig::default().with_seed(9).with_box_count(5)).unwrap();

        for (ha, hb) in a.crates().iter().zip(b.crates()) {
            assert_eq!(a.world().translation(*ha), b.world().translation(*hb));
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Scene::new(SceneConfig::default().with_hole_size(-1.0, 2.0));
        assert!(matches!(result, Err(SceneError::InvalidSinkhole { .. })));
    }

    #[test]
    fn test_tick_publishes_positions() {
        let mut scene = empty_scene();
        let handle = scene.spawn_crate(Vec3::new(4.0, 6.0, 4.0));

        let report = scene.tick(DT);

        assert_eq!(report.tick, 1);
        let published = scene.crate_position(handle).unwrap();
        assert_eq!(Some(published), scene.world().translation(handle));
        assert!(published.y < 6.0);
    }

    #[test]
    fn test_pointer_at_screen_center_moves_hole_to_look_at_point() {
        let config = SceneConfig::default()
            .with_seed(1)
            .with_box_count(0)
            .with_hole_position(Vec3::new(5.0, 0.5, 5.0));
        let mut scene = Scene::new(config).unwrap();
        scene.resize(1280.0, 720.0);

        let target = scene.pointer_moved(640.0, 360.0).unwrap();
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(target.y, 0.5);
        assert_relative_eq!(target.z, 0.0, epsilon = 1e-3);

        // Not applied until the next tick
        assert_eq!(scene.hole_position(), Vec3::new(5.0, 0.5, 5.0));

        scene.tick(DT);

        assert_eq!(scene.hole_position(), target);
        let body = scene.world().translation(scene.hole.body()).unwrap();
        assert_relative_eq!(body.x, target.x, epsilon = 1e-4);
        assert_relative_eq!(body.z, target.z, epsilon = 1e-4);
    }

    #[test]
    fn test_pointer_above_horizon_keeps_hole() {
        let mut config = SceneConfig::default().with_seed(7).with_box_count(0);
        // Level camera: the upper half of the screen is sky
        config.camera_target = Vec3::new(0.0, 10.0, 0.0);
        let mut scene = Scene::new(config).unwrap();
        scene.resize(1280.0, 720.0);

        assert_eq!(scene.pointer_moved(640.0, 0.0), None);
        scene.tick(DT);
        assert_eq!(scene.hole_position(), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_hole_pulls_overlapping_crate_down() {
        let mut scene = empty_scene();
        let pulled = scene.spawn_crate(Vec3::new(0.5, 2.4, 0.0));
        let control = scene.spawn_crate(Vec3::new(5.0, 2.4, 0.0));

        let first = scene.tick(DT);
        assert_eq!(first.pulled, 1);

        scene.tick(DT);
        scene.tick(DT);

        let pulled_y = scene.crate_position(pulled).unwrap().y;
        let control_y = scene.crate_position(control).unwrap().y;
        // Same fall under gravity, plus at least two applied pulls
        assert!(pulled_y < control_y - 0.09, "{} vs {}", pulled_y, control_y);
    }

    #[test]
    fn test_resting_crate_is_swallowed() {
        let config = SceneConfig::default()
            .with_seed(7)
            .with_box_count(0)
            .with_hole_position(Vec3::new(15.0, 0.5, 15.0));
        let mut scene = Scene::new(config).unwrap();
        let swallowed = scene.spawn_crate(Vec3::new(0.5, 0.6, 0.0));
        let bystander = scene.spawn_crate(Vec3::new(-6.0, 0.6, 0.0));

        for _ in 0..120 {
            assert_eq!(scene.tick(DT).pulled, 0);
        }
        let rest_y = scene.crate_position(swallowed).unwrap().y;
        assert!((0.4..0.6).contains(&rest_y), "resting height {}", rest_y);

        scene.set_hole_target(Vec3::new(0.0, 0.5, 0.0));
        let mut ticks = 0;
        while scene.despawned_total() == 0 && ticks < 300 {
            scene.tick(DT);
            ticks += 1;
        }

        assert_eq!(scene.despawned_total(), 1, "still there after {} ticks", ticks);
        assert_eq!(scene.crates(), &[bystander]);
        assert!(!scene.registry().contains(swallowed));

        // The floor still holds everything the hole never touched
        let y = scene.crate_position(bystander).unwrap().y;
        assert!((0.4..0.6).contains(&y), "bystander at {}", y);
    }

    #[test]
    fn test_crate_outside_hole_settles_on_ground() {
        let mut scene = empty_scene();
        let handle = scene.spawn_crate(Vec3::new(8.0, 3.0, -8.0));

        let mut pulled = 0;
        for _ in 0..240 {
            pulled += scene.tick(DT).pulled;
        }

        assert_eq!(pulled, 0);
        let y = scene.crate_position(handle).unwrap().y;
        assert!((0.4..0.6).contains(&y), "resting height {}", y);
    }

    #[test]
    fn test_crates_below_kill_plane_are_removed() {
        let mut scene = empty_scene();
        let lost = scene.spawn_crate(Vec3::new(30.0, -20.0, 30.0));
        let kept = scene.spawn_crate(Vec3::new(3.0, 5.0, 3.0));

        let report = scene.tick(DT);

        assert_eq!(report.despawned, 1);
        assert_eq!(scene.despawned_total(), 1);
        assert_eq!(scene.crates(), &[kept]);
        assert!(!scene.registry().contains(lost));
        assert!(scene.world().get_rigid_body(lost).is_none());

        // Later ticks carry on without the removed crate
        let report = scene.tick(DT);
        assert_eq!(report.despawned, 0);
        assert_eq!(scene.tick_count(), 2);
    }

    #[test]
    fn test_hole_target_last_write_wins() {
        let mut scene = empty_scene();
        scene.set_hole_target(Vec3::new(-3.0, 0.5, 2.0));
        scene.set_hole_target(Vec3::new(1.0, 0.5, 1.0));

        scene.tick(DT);

        assert_eq!(scene.hole_position(), Vec3::new(1.0, 0.5, 1.0));
    }
}
