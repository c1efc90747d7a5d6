// Perspective camera used to turn pointer positions into world rays

use glam::{Mat4, Vec2, Vec3};

/// 3D perspective camera looking at a fixed point
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    position: Vec3,
    /// Point the camera looks at
    target: Vec3,
    /// Vertical field of view in radians
    fov_y: f32,
    /// Viewport width / height
    aspect: f32,
    near: f32,
    far: f32,
    /// View-projection matrix
    view_proj: Mat4,
}

/// Half-line from the camera into the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRay {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, target: Vec3, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position,
            target,
            fov_y: fov_y_degrees.to_radians(),
            aspect: 1.0,
            near,
            far,
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    /// Update the view-projection matrix
    fn update_view_proj(&mut self) {
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
        self.view_proj = projection * view;
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.aspect = width / height;
        self.update_view_proj();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Ray through a point given in normalized device coordinates (-1..1, y up)
    pub fn ray_through(&self, ndc: Vec2) -> CameraRay {
        // glam's perspective_rh maps the far plane to depth 1
        let far = self
            .view_proj
            .inverse()
            .project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

        CameraRay {
            origin: self.position,
            direction: (far - self.position).normalize(),
        }
    }

    /// Project a world point to normalized device coordinates
    pub fn world_to_ndc(&self, world_pos: Vec3) -> Vec2 {
        self.view_proj.project_point3(world_pos).truncate()
    }
}
