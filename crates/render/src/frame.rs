use crate::camera::FreeCamera;
use glam::{Mat4, Vec3};

/// Per-frame snapshot of everything the render loop reads from the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub eye: Vec3,
    pub direction: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Frame {
    pub fn capture(camera: &FreeCamera) -> Self {
        Self {
            eye: camera.position,
            direction: camera.view_direction(),
            view: camera.view_matrix(),
            projection: camera.projection(),
        }
    }

    /// Combined transform uploaded as the `MVP` uniform. The grid sits at the
    /// world origin, so there is no model term.
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view
    }
}
