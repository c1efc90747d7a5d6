use rapier3d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// The floor
    Ground = 0b0000_0010,

    /// Falling boxes
    Crate = 0b0000_0100,

    /// Sensors (the sinkhole) - don't cause physical collision
    Sensor = 0b0000_1000,

    /// Boxes pulled by the sinkhole; they no longer touch the ground
    Falling = 0b0001_0000,
}

impl CollisionGroups {
    /// Convert to rapier3d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // The ground only needs to stop crates
            CollisionGroups::Ground => Group::from_bits_truncate(
                CollisionGroups::Crate as u32 | CollisionGroups::Default as u32,
            ),

            // Crates land on the ground, stack on each other and are seen by sensors
            CollisionGroups::Crate => Group::from_bits_truncate(
                CollisionGroups::Ground as u32
                    | CollisionGroups::Crate as u32
                    | CollisionGroups::Falling as u32
                    | CollisionGroups::Sensor as u32
                    | CollisionGroups::Default as u32,
            ),

            // Sensors only report crates
            CollisionGroups::Sensor => Group::from_bits_truncate(
                CollisionGroups::Crate as u32 | CollisionGroups::Falling as u32,
            ),

            // Same as a crate minus the ground
            CollisionGroups::Falling => Group::from_bits_truncate(
                CollisionGroups::Crate as u32
                    | CollisionGroups::Falling as u32
                    | CollisionGroups::Sensor as u32
                    | CollisionGroups::Default as u32,
            ),

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Collision event reported by the physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
        sensor: bool,
    },
}

impl CollisionEvent {
    /// Whether one of the colliders is a sensor
    pub fn is_sensor(&self) -> bool {
        match self {
            CollisionEvent::Started { sensor, .. } | CollisionEvent::Stopped { sensor, .. } => {
                *sensor
            }
        }
    }
}

/// Queue for storing collision events during physics step
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))), // Pre-allocate for common case
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this step
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// Rapier calls the handler through a shared reference, hence the mutex
impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier3d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier3d::prelude::CollisionEvent::Started(h1, h2, flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
            rapier3d::prelude::CollisionEvent::Stopped(h1, h2, flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                    sensor: flags.contains(CollisionEventFlags::SENSOR),
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
