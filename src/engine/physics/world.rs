use glam::Vec3;
use log::{debug, warn};
use rapier3d::prelude::*;

use super::body::{from_vector, to_vector};
use super::collision::{
    CollisionEvent as SceneCollisionEvent, CollisionEventQueue, CollisionGroups,
};
use super::trigger::PositionOverride;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector (default: -9.81 m/s² in y-axis)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// Collision event handler
    collision_event_queue: CollisionEventQueue,

    /// Position overrides to apply at the start of the next step
    pending_overrides: Vec<PositionOverride>,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
            pending_overrides: Vec::new(),
        }
    }

    /// Step the physics simulation forward by `dt` seconds
    ///
    /// Queued position overrides are applied first, so every write to body
    /// state happens inside the step.
    pub fn step(&mut self, dt: Real) {
        self.collision_event_queue.clear();
        self.apply_overrides();

        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &self.collision_event_queue,
        );
    }

    fn apply_overrides(&mut self) {
        for request in self.pending_overrides.drain(..) {
            let Some(body) = self.rigid_body_set.get_mut(request.id) else {
                // Removed between ticks
                debug!("Dropping override for removed body {:?}", request.id);
                continue;
            };

            body.set_translation(to_vector(request.position), true);

            if request.release_ground {
                let falling = CollisionGroups::Falling.to_interaction_groups();
                for handle in body.colliders() {
                    if let Some(collider) = self.collider_set.get_mut(*handle) {
                        collider.set_collision_groups(falling);
                    }
                }
            }
        }
    }

    /// Add a rigid body with a single collider
    pub fn add_body(&mut self, body: RigidBody, collider: Collider) -> RigidBodyHandle {
        let handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        self.pending_overrides.retain(|request| request.id != handle);
    }

    /// Queue position overrides for the next step. A later request for the same body wins.
    pub fn queue_overrides(&mut self, overrides: impl IntoIterator<Item = PositionOverride>) {
        self.pending_overrides.extend(overrides);
    }

    /// Number of overrides waiting for the next step
    pub fn pending_override_count(&self) -> usize {
        self.pending_overrides.len()
    }

    /// Move a kinematic body to `position` during the next step
    pub fn set_next_kinematic_translation(&mut self, handle: RigidBodyHandle, position: Vec3) {
        match self.rigid_body_set.get_mut(handle) {
            Some(body) if body.is_kinematic() => {
                body.set_next_kinematic_translation(to_vector(position))
            }
            Some(_) => warn!("Body {:?} is not kinematic, ignoring target", handle),
            None => warn!("No body {:?} to move", handle),
        }
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Current translation of a body
    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_vector(body.translation()))
    }

    /// Translation of every body in the world
    pub fn positions(&self) -> impl Iterator<Item = (RigidBodyHandle, Vec3)> + '_ {
        self.rigid_body_set
            .iter()
            .map(|(handle, body)| (handle, from_vector(body.translation())))
    }

    /// Number of rigid bodies, fixed ones included
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Get all collision events from the last step
    pub fn collision_events(&self) -> Vec<SceneCollisionEvent> {
        self.collision_event_queue.events()
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    /// Timestep used by the last step
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
