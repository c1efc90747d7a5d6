// Ray / ground plane intersection for placing things under the pointer

use glam::Vec3;
use parry3d::math::{Point, Real, Vector};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::HalfSpace;

use crate::engine::camera::CameraRay;

/// Horizontal plane the pointer is projected onto
#[derive(Debug, Clone, Copy)]
pub struct GroundPicker {
    height: f32,
    max_distance: Real,
}

impl GroundPicker {
    /// Picker for the plane `y = height`, ignoring hits farther than `max_distance`
    pub fn new(height: f32, max_distance: f32) -> Self {
        Self {
            height,
            max_distance,
        }
    }

    /// Where the ray crosses the plane, if it does in front of its origin
    ///
    /// The plane is two-sided: a ray starting below it and pointing up hits too.
    pub fn pick(&self, ray: &CameraRay) -> Option<Vec3> {
        let plane = HalfSpace::new(Vector::y_axis());
        let local = Ray::new(
            Point::new(ray.origin.x, ray.origin.y - self.height, ray.origin.z),
            Vector::new(ray.direction.x, ray.direction.y, ray.direction.z),
        );

        plane
            .cast_local_ray(&local, self.max_distance, false)
            .map(|toi| {
                let hit = local.point_at(toi);
                Vec3::new(hit.x, self.height, hit.z)
            })
    }
}
