use glam::Vec3;
use log::warn;
use std::collections::HashMap;

use super::body::RigidBodyHandle;

/// Stable identifier of a body, assigned by the physics engine
pub type BodyId = RigidBodyHandle;

/// Role of a registered body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Regular dynamic body, a candidate for overlap
    Dynamic,

    /// The sensor volume itself
    Trigger,
}

#[derive(Debug, Clone, Copy)]
struct BodyEntry {
    kind: BodyKind,
    /// Last position published by the physics step, `None` until the first sync
    position: Option<Vec3>,
}

/// Current position of every live body, keyed by engine handle
///
/// Holds state only. The physics wrapper registers bodies when they are
/// created, publishes their positions once per tick and unregisters them
/// when they leave the simulation.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: HashMap<BodyId, BodyEntry>,
}

impl BodyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body. Returns false (and changes nothing) if the id is already present.
    pub fn register(&mut self, id: BodyId, kind: BodyKind) -> bool {
        if self.bodies.contains_key(&id) {
            return false;
        }
        self.bodies.insert(id, BodyEntry { kind, position: None });
        true
    }

    /// Remove a body. Removing an absent id is a no-op.
    pub fn unregister(&mut self, id: BodyId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    /// Overwrite the position of a registered body
    pub fn update_position(&mut self, id: BodyId, position: Vec3) -> bool {
        match self.bodies.get_mut(&id) {
            Some(entry) => {
                entry.position = Some(position);
                true
            }
            None => {
                warn!("Ignoring position update for unregistered body {:?}", id);
                false
            }
        }
    }

    /// Every body except `id` that has reported a position
    ///
    /// Order is unspecified. The iterator borrows the registry, so bodies
    /// cannot be added or removed while it is alive.
    pub fn all_except(&self, id: BodyId) -> impl Iterator<Item = (BodyId, Vec3)> + '_ {
        self.bodies
            .iter()
            .filter(move |(other, _)| **other != id)
            .filter_map(|(other, entry)| entry.position.map(|p| (*other, p)))
    }

    /// Last published position of a body
    pub fn position(&self, id: BodyId) -> Option<Vec3> {
        self.bodies.get(&id).and_then(|entry| entry.position)
    }

    /// Role of a body, if registered
    pub fn kind(&self, id: BodyId) -> Option<BodyKind> {
        self.bodies.get(&id).map(|entry| entry.kind)
    }

    /// Check if a body is registered
    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Dynamic bodies whose last position is below `y`
    pub fn dynamic_below(&self, y: f32) -> Vec<BodyId> {
        self.bodies
            .iter()
            .filter(|(_, entry)| entry.kind == BodyKind::Dynamic)
            .filter(|(_, entry)| entry.position.is_some_and(|p| p.y < y))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of registered bodies, trigger included
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
