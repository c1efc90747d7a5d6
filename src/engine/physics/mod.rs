// Physics system using rapier3d, plus the sinkhole trigger that rides on it

pub mod body;
mod collision;
mod registry;
mod trigger;
mod world;

pub use body::{presets, RigidBodyHandle};
pub use collision::{CollisionEvent, CollisionGroups};
pub use registry::{BodyId, BodyKind, BodyRegistry};
pub use trigger::{
    OverlapBody, OverlapEffect, OverlapTrigger, PositionOverride, Sink, TriggerVolume,
};
pub use world::PhysicsWorld;
