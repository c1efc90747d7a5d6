// Kinematic overlap trigger ("the hole")
//
// A vertical cylinder driven by the pointer. Once per tick it scans every
// registered body and hands the overlapping ones to its effect. Overlap is
// continuous: there is no enter/exit state, a body is affected on every tick
// it is inside the volume.
//
// The scan is O(n) over all bodies with no spatial partitioning. That holds
// up for tens of bodies; larger populations would need a spatial index.

use glam::Vec3;
use log::trace;

use super::registry::{BodyId, BodyRegistry};
use crate::core::math::horizontal_distance_squared;

/// Cylinder approximated by a horizontal disc test plus a vertical band
///
/// This is not a point-in-cylinder test: a body overlaps when its center is
/// within `radius` of the axis on the ground plane and less than `height`
/// away vertically from the trigger center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerVolume {
    radius: f32,
    height: f32,
}

impl TriggerVolume {
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Check whether a body centered at `point` overlaps the volume centered at `center`
    ///
    /// The horizontal bound is inclusive, the vertical bound is exclusive.
    pub fn overlaps(&self, center: Vec3, point: Vec3) -> bool {
        horizontal_distance_squared(center, point) <= self.radius * self.radius
            && (center.y - point.y).abs() < self.height
    }
}

/// A body handed to an overlap effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapBody {
    pub id: BodyId,
    pub position: Vec3,
}

/// Request to move a body, applied by the physics world at the start of its next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOverride {
    pub id: BodyId,
    pub position: Vec3,
    /// Stop the body colliding with the ground from now on
    pub release_ground: bool,
}

/// What happens to a body while it overlaps the trigger
pub trait OverlapEffect {
    /// Return the position the body should be moved to, or `None` to leave it alone
    fn apply(&mut self, body: &OverlapBody) -> Option<Vec3>;

    /// Whether moved bodies should drop through the ground
    fn releases_ground(&self) -> bool {
        false
    }
}

impl<F> OverlapEffect for F
where
    F: FnMut(&OverlapBody) -> Option<Vec3>,
{
    fn apply(&mut self, body: &OverlapBody) -> Option<Vec3> {
        self(body)
    }
}

/// Pulls bodies straight down by a fixed distance per tick, with no floor
///
/// Pulled bodies are released from the ground so the physics step doesn't
/// push them back up.
#[derive(Debug, Clone, Copy)]
pub struct Sink {
    step: f32,
}

impl Sink {
    pub fn new(step: f32) -> Self {
        Self { step }
    }
}

impl OverlapEffect for Sink {
    fn apply(&mut self, body: &OverlapBody) -> Option<Vec3> {
        Some(body.position - Vec3::Y * self.step)
    }

    fn releases_ground(&self) -> bool {
        true
    }
}

/// The moving sensor volume and its effect
pub struct OverlapTrigger {
    /// Handle of the kinematic sensor body, excluded from its own scan
    body: BodyId,

    volume: TriggerVolume,

    /// Position used by the last evaluation
    position: Vec3,

    /// Next position slot; a later request replaces an earlier one
    pending_target: Option<Vec3>,

    effect: Box<dyn OverlapEffect>,
}

impl OverlapTrigger {
    /// Create a trigger for an existing sensor body
    pub fn new(
        body: BodyId,
        volume: TriggerVolume,
        position: Vec3,
        effect: impl OverlapEffect + 'static,
    ) -> Self {
        Self {
            body,
            volume,
            position,
            pending_target: None,
            effect: Box::new(effect),
        }
    }

    /// Request the trigger position for the next evaluation
    pub fn set_target_position(&mut self, point: Vec3) {
        self.pending_target = Some(point);
    }

    /// Target requested since the last evaluation, if any
    pub fn pending_target(&self) -> Option<Vec3> {
        self.pending_target
    }

    /// Position the trigger was last evaluated at
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn volume(&self) -> TriggerVolume {
        self.volume
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Commit the pending target, then run the effect on every overlapping body
    ///
    /// Must run once per tick, after the registry holds this tick's positions.
    /// Returns the position overrides produced by the effect, one per
    /// overlapping body the effect chose to move.
    pub fn evaluate_overlaps(&mut self, registry: &BodyRegistry) -> Vec<PositionOverride> {
        if let Some(target) = self.pending_target.take() {
            self.position = target;
        }

        let center = self.position;
        let release_ground = self.effect.releases_ground();
        let mut overrides = Vec::new();

        for (id, position) in registry.all_except(self.body) {
            if !self.volume.overlaps(center, position) {
                continue;
            }

            trace!("Body {:?} overlaps trigger at {:?}", id, position);

            let body = OverlapBody { id, position };
            if let Some(next) = self.effect.apply(&body) {
                overrides.push(PositionOverride {
                    id,
                    position: next,
                    release_ground,
                });
            }
        }

        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::registry::BodyKind;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TRIGGER: u32 = 0;

    fn id(n: u32) -> BodyId {
        BodyId::from_raw_parts(n, 0)
    }

    /// Registry holding the trigger at `center` plus the given bodies
    fn registry_with(center: Vec3, bodies: &[Vec3]) -> BodyRegistry {
        let mut registry = BodyRegistry::new();
        registry.register(id(TRIGGER), BodyKind::Trigger);
        registry.update_position(id(TRIGGER), center);
        for (i, position) in bodies.iter().enumerate() {
            let body = id(i as u32 + 1);
            registry.register(body, BodyKind::Dynamic);
            registry.update_position(body, *position);
        }
        registry
    }

    /// Effect that records every body it sees and leaves it in place
    fn recorder() -> (Rc<RefCell<Vec<BodyId>>>, impl OverlapEffect) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let effect = move |body: &OverlapBody| -> Option<Vec3> {
            sink.borrow_mut().push(body.id);
            None
        };
        (seen, effect)
    }

    fn hole(position: Vec3, effect: impl OverlapEffect + 'static) -> OverlapTrigger {
        OverlapTrigger::new(id(TRIGGER), TriggerVolume::new(2.0, 2.0), position, effect)
    }

    #[test]
    fn test_reference_scenario() {
        let volume = TriggerVolume::new(2.0, 2.0);
        let center = Vec3::new(0.0, 0.5, 0.0);

        assert!(volume.overlaps(center, Vec3::new(1.0, 1.0, 1.0)));
        assert!(!volume.overlaps(center, Vec3::new(3.0, 1.0, 0.0)));
    }

    #[test]
    fn test_horizontal_boundary_is_inclusive() {
        let volume = TriggerVolume::new(2.0, 2.0);
        let center = Vec3::new(0.0, 0.5, 0.0);

        assert!(volume.overlaps(center, Vec3::new(2.0, 0.5, 0.0)));
        assert!(volume.overlaps(center, Vec3::new(0.0, 0.5, -2.0)));
        assert!(!volume.overlaps(center, Vec3::new(2.001, 0.5, 0.0)));
    }

    #[test]
    fn test_vertical_boundary_is_exclusive() {
        let volume = TriggerVolume::new(2.0, 2.0);
        let center = Vec3::new(0.0, 0.5, 0.0);

        assert!(!volume.overlaps(center, Vec3::new(0.0, 2.5, 0.0)));
        assert!(!volume.overlaps(center, Vec3::new(0.0, -1.5, 0.0)));
        assert!(volume.overlaps(center, Vec3::new(0.0, 2.499, 0.0)));
    }

    #[test]
    fn test_overlap_predicate_grid() {
        let (r, h) = (1.5_f32, 0.75_f32);
        let volume = TriggerVolume::new(r, h);
        let center = Vec3::new(4.0, 1.0, -3.0);

        for &dx in &[-2.0_f32, -1.5, -1.0, 0.0, 0.5, 1.25, 1.5, 2.0] {
            for &dz in &[-1.5_f32, -0.5, 0.0, 1.0, 1.5] {
                for &dy in &[-1.0_f32, -0.75, -0.5, 0.0, 0.25, 0.75, 1.0] {
                    let point = center + Vec3::new(dx, dy, dz);
                    let expected = dx * dx + dz * dz <= r * r && dy.abs() < h;
                    assert_eq!(
                        volume.overlaps(center, point),
                        expected,
                        "offset ({}, {}, {})",
                        dx,
                        dy,
                        dz
                    );
                }
            }
        }
    }

    #[test]
    fn test_last_target_wins() {
        let far = Vec3::new(50.0, 0.0, 50.0);
        let registry = registry_with(Vec3::ZERO, &[Vec3::new(10.0, 0.5, 10.0)]);
        let (seen, effect) = recorder();
        let mut trigger = hole(far, effect);

        trigger.set_target_position(Vec3::new(-10.0, 0.5, -10.0));
        trigger.set_target_position(Vec3::new(10.0, 0.5, 10.0));
        assert_eq!(trigger.pending_target(), Some(Vec3::new(10.0, 0.5, 10.0)));

        trigger.evaluate_overlaps(&registry);

        assert_eq!(trigger.position(), Vec3::new(10.0, 0.5, 10.0));
        assert_eq!(trigger.pending_target(), None);
        assert_eq!(*seen.borrow(), vec![id(1)]);
    }

    #[test]
    fn test_position_held_without_new_target() {
        let start = Vec3::new(0.0, 0.5, 0.0);
        let registry = registry_with(start, &[]);
        let mut trigger = hole(start, Sink::new(0.05));

        trigger.set_target_position(Vec3::new(3.0, 0.5, 3.0));
        trigger.evaluate_overlaps(&registry);
        trigger.evaluate_overlaps(&registry);

        assert_eq!(trigger.position(), Vec3::new(3.0, 0.5, 3.0));
    }

    #[test]
    fn test_no_bodies_no_effect() {
        let registry = registry_with(Vec3::ZERO, &[]);
        let (seen, effect) = recorder();
        let mut trigger = hole(Vec3::ZERO, effect);

        let overrides = trigger.evaluate_overlaps(&registry);

        assert!(overrides.is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_trigger_never_affects_itself() {
        // Trigger entry sits exactly at the center
        let registry = registry_with(Vec3::new(0.0, 0.5, 0.0), &[]);
        let mut trigger = hole(Vec3::new(0.0, 0.5, 0.0), Sink::new(0.05));

        assert!(trigger.evaluate_overlaps(&registry).is_empty());
    }

    #[test]
    fn test_effect_runs_once_per_overlapping_body() {
        let center = Vec3::new(0.0, 0.5, 0.0);
        let bodies = [
            Vec3::new(1.0, 1.0, 1.0),   // inside
            Vec3::new(3.0, 1.0, 0.0),   // too far out
            Vec3::new(0.0, -1.0, 0.5),  // inside, below center
            Vec3::new(0.5, 4.0, 0.0),   // above the band
            Vec3::new(-2.0, 0.5, 0.0),  // on the rim
            Vec3::new(-1.5, 0.5, -1.5), // outside the disc
        ];
        let registry = registry_with(center, &bodies);
        let (seen, effect) = recorder();
        let mut trigger = hole(center, effect);

        let overrides = trigger.evaluate_overlaps(&registry);

        let mut seen = seen.borrow().clone();
        seen.sort_by_key(|h| h.into_raw_parts().0);
        assert_eq!(seen, vec![id(1), id(3), id(5)]);
        // The recorder declines to move anything
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_sink_produces_override_per_overlap() {
        let center = Vec3::new(0.0, 0.5, 0.0);
        let registry = registry_with(center, &[Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 1.0, 0.0)]);
        let mut trigger = hole(center, Sink::new(0.05));

        let overrides = trigger.evaluate_overlaps(&registry);

        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].id, id(1));
        assert_relative_eq!(overrides[0].position.x, 1.0);
        assert_relative_eq!(overrides[0].position.y, 0.95);
        assert_relative_eq!(overrides[0].position.z, 1.0);
        assert!(overrides[0].release_ground);
    }

    #[test]
    fn test_closure_effect_keeps_ground() {
        let center = Vec3::new(0.0, 0.5, 0.0);
        let registry = registry_with(center, &[Vec3::new(0.0, 1.0, 0.0)]);
        let lift = |body: &OverlapBody| Some(body.position + Vec3::Y);
        let mut trigger = hole(center, lift);

        let overrides = trigger.evaluate_overlaps(&registry);

        assert_eq!(overrides.len(), 1);
        assert!(!overrides[0].release_ground);
    }

    #[test]
    fn test_sinking_stops_below_height_band() {
        let center = Vec3::new(0.0, 0.5, 0.0);
        let mut registry = registry_with(center, &[Vec3::new(0.5, 0.475, 0.0)]);
        let mut trigger = hole(center, Sink::new(0.05));
        let body = id(1);

        let mut ticks_affected = 0;
        for _ in 0..100 {
            let before = registry.position(body).unwrap();
            let overrides = trigger.evaluate_overlaps(&registry);
            if overrides.is_empty() {
                break;
            }

            assert_eq!(overrides.len(), 1);
            assert_relative_eq!(overrides[0].position.y, before.y - 0.05, epsilon = 1e-5);
            registry.update_position(body, overrides[0].position);
            ticks_affected += 1;
        }

        // Starts 0.025 below the center and leaves once 2.0 below it
        assert_eq!(ticks_affected, 40);
        let y = registry.position(body).unwrap().y;
        assert_relative_eq!(y, -1.525, epsilon = 1e-4);

        // Further ticks leave it alone
        assert!(trigger.evaluate_overlaps(&registry).is_empty());
        assert!(trigger.evaluate_overlaps(&registry).is_empty());
    }
}
