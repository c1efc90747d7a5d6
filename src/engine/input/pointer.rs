// Pointer position tracking in normalized device coordinates

use glam::Vec2;

/// Last known pointer position, kept in normalized device coordinates
///
/// x runs -1 (left) to 1 (right), y runs -1 (bottom) to 1 (top).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    ndc: Vec2,
    viewport: Vec2,
}

impl PointerState {
    /// Pointer at the center of a viewport of the given pixel size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            ndc: Vec2::ZERO,
            viewport: Vec2::new(width, height),
        }
    }

    /// Record a pointer move, in pixels from the top-left corner
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.ndc = Vec2::new(
            (x / self.viewport.x) * 2.0 - 1.0,
            -(y / self.viewport.y) * 2.0 + 1.0,
        );
    }

    /// Track a new viewport size. The stored position is kept as-is.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }
}
