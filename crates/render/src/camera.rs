use glam::{Mat4, Quat, Vec2, Vec3};
use ripple_common::CameraConfig;
use ripple_input::{CameraAction, PointerSample};

pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Free-flying camera driven by pointer drags and discrete movement steps.
///
/// The right axis is derived from the view direction and world up on every
/// read. It is not normalized, and it is degenerate when the view direction is
/// parallel to up; pitch is not clamped, so that state is reachable.
#[derive(Debug, Clone)]
pub struct FreeCamera {
    pub position: Vec3,
    /// Euler angles in degrees, applied after the look-at (X, then Y, then Z).
    pub rotation: Vec3,
    /// Degrees per pixel of pointer movement.
    pub rotate_speed: f32,
    view_direction: Vec3,
    up: Vec3,
    last_mouse: Vec2,
    projection: Mat4,
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            rotate_speed: 0.1,
            view_direction: Vec3::NEG_Z,
            up: Vec3::Y,
            last_mouse: Vec2::ZERO,
            projection: Mat4::IDENTITY,
        }
    }
}

impl FreeCamera {
    /// Camera at the configured startup pose. The projection stays identity
    /// until `set_perspective` is called with the real viewport aspect.
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: config.position,
            rotation: config.rotation,
            rotate_speed: config.rotate_speed,
            ..Self::default()
        }
    }

    pub fn view_direction(&self) -> Vec3 {
        self.view_direction
    }

    pub fn up_axis(&self) -> Vec3 {
        self.up
    }

    pub fn right_axis(&self) -> Vec3 {
        self.view_direction.cross(self.up)
    }

    pub fn last_mouse_position(&self) -> Vec2 {
        self.last_mouse
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn set_perspective(&mut self, fov_degrees: f32, aspect: f32) {
        self.set_perspective_with_clip(fov_degrees, aspect, DEFAULT_NEAR, DEFAULT_FAR);
    }

    pub fn set_perspective_with_clip(&mut self, fov_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Mat4::perspective_rh(fov_degrees.to_radians(), aspect, near, far);
        tracing::debug!(fov_degrees, aspect, near, far, "projection updated");
    }

    /// World-to-view transform: look-at from the current pose, followed by the
    /// fixed Euler rotation about the world X, Y and Z axes in that order.
    pub fn view_matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::look_at_rh(self.position, self.position + self.view_direction, self.up)
            * Mat4::from_rotation_x(r.x.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_z(r.z.to_radians())
    }

    /// Feed one pointer observation. While dragging, the delta from the
    /// previous observation yaws about world up and then pitches about the
    /// post-yaw right axis. The position is always remembered.
    pub fn update_mouse(&mut self, position: Vec2, dragging: bool) {
        if dragging {
            let delta = position - self.last_mouse;

            let yaw = Quat::from_axis_angle(self.up, (-delta.x * self.rotate_speed).to_radians());
            self.view_direction = yaw * self.view_direction;

            // pitch axis must come from the post-yaw heading; a zero pitch
            // never touches it, so a vertical heading survives horizontal drags
            let pitch_degrees = -delta.y * self.rotate_speed;
            if pitch_degrees != 0.0 {
                let right = self.right_axis().normalize();
                let pitch = Quat::from_axis_angle(right, pitch_degrees.to_radians());
                self.view_direction = pitch * self.view_direction;
            }

            tracing::trace!(dx = delta.x, dy = delta.y, "camera rotated");
        }
        self.last_mouse = position;
    }

    pub fn update_pointer(&mut self, sample: PointerSample) {
        self.update_mouse(sample.position, sample.dragging);
    }

    pub fn move_forward(&mut self) {
        self.position += self.view_direction;
    }

    pub fn move_backward(&mut self) {
        self.position -= self.view_direction;
    }

    pub fn lift_up(&mut self) {
        self.position += self.up;
    }

    pub fn lift_down(&mut self) {
        self.position -= self.up;
    }

    pub fn strafe_left(&mut self) {
        self.position -= self.right_axis();
    }

    pub fn strafe_right(&mut self) {
        self.position += self.right_axis();
    }

    pub fn apply(&mut self, action: CameraAction) {
        match action {
            CameraAction::Forward => self.move_forward(),
            CameraAction::Backward => self.move_backward(),
            CameraAction::StrafeLeft => self.strafe_left(),
            CameraAction::StrafeRight => self.strafe_right(),
            CameraAction::LiftUp => self.lift_up(),
            CameraAction::LiftDown => self.lift_down(),
        }
    }
}
