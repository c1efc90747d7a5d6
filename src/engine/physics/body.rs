use super::collision::CollisionGroups;
use glam::Vec3;
use rapier3d::prelude::*;

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    translation: Vector<Real>,
    gravity_scale: Real,
    can_sleep: bool,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            translation: Vector::zeros(),
            gravity_scale: 1.0,
            can_sleep: true,
        }
    }

    /// Create a new kinematic position-based body (moved by setting its next position)
    pub fn new_kinematic_position_based() -> Self {
        Self {
            body_type: RigidBodyType::KinematicPositionBased,
            translation: Vector::zeros(),
            gravity_scale: 0.0,
            can_sleep: false,
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            translation: Vector::zeros(),
            gravity_scale: 0.0,
            can_sleep: false,
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, position: Vec3) -> Self {
        self.translation = to_vector(position);
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .translation(self.translation)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder3D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    is_sensor: bool,
    friction: Real,
    restitution: Real,
    density: Real,
    active_events: ActiveEvents,
}

impl ColliderBuilder3D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Default,
            is_sensor: false,
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
            active_events: ActiveEvents::empty(),
        }
    }

    /// Create a box-shaped collider from its full size
    pub fn cuboid(size: Vec3) -> Self {
        let half = size / 2.0;
        Self::with_shape(SharedShape::cuboid(half.x, half.y, half.z))
    }

    /// Create an upright cylinder collider of the given full height
    pub fn cylinder(height: Real, radius: Real) -> Self {
        Self::with_shape(SharedShape::cylinder(height / 2.0, radius))
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Make this a sensor (detects intersections but doesn't cause physical response)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Report collision start/stop events for this collider
    pub fn collision_events(mut self) -> Self {
        self.active_events |= ActiveEvents::COLLISION_EVENTS;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        rapier3d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .sensor(self.is_sensor)
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .active_events(self.active_events)
            .build()
    }
}

/// Convert a glam vector into rapier's vector type
pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

/// Convert a rapier vector into glam
pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Rigid body configurations for the scene's objects
pub mod presets {
    use super::*;

    /// The floor (fixed)
    pub fn ground_body(position: Vec3) -> RigidBody {
        BodyBuilder::new_fixed().position(position).build()
    }

    pub fn ground_collider(size: Vec3) -> Collider {
        ColliderBuilder3D::cuboid(size)
            .collision_groups(CollisionGroups::Ground)
            .build()
    }

    /// A falling box (dynamic)
    pub fn crate_body(position: Vec3) -> RigidBody {
        BodyBuilder::new_dynamic().position(position).build()
    }

    pub fn crate_collider(size: Vec3) -> Collider {
        ColliderBuilder3D::cuboid(size)
            .collision_groups(CollisionGroups::Crate)
            .friction(0.6)
            .restitution(0.1)
            .build()
    }

    /// The sinkhole: kinematic, moved to the pointer every tick
    pub fn sinkhole_body(position: Vec3) -> RigidBody {
        BodyBuilder::new_kinematic_position_based()
            .position(position)
            .build()
    }

    /// Invisible cylinder sensor; never pushes anything
    pub fn sinkhole_collider(radius: Real, height: Real) -> Collider {
        ColliderBuilder3D::cylinder(height, radius)
            .collision_groups(CollisionGroups::Sensor)
            .sensor(true)
            .collision_events()
            .build()
    }
}
