use glade_shared::physics::Ray;
use glam::{Mat4, Vec2, Vec3};

const MAX_PITCH: f32 = 89.0_f32.to_radians();
/// Raw mouse counts per radian scale.
const SENSITIVITY_SCALE: f32 = 0.001;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            // Looking down -Z.
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn update_look(&mut self, mouse_delta: Vec2, mouse_sensitivity: f32) {
        let sensitivity = mouse_sensitivity * SENSITIVITY_SCALE;
        self.yaw += mouse_delta.x * sensitivity;
        self.pitch -= mouse_delta.y * sensitivity;
        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn forward_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize_or_zero()
    }

    /// Billboard axes facing the camera.
    pub fn right_and_up(&self) -> (Vec3, Vec3) {
        let forward = self.forward_direction();
        let mut right = forward.cross(Vec3::Y).normalize_or_zero();
        if right.length_squared() < 1e-6 {
            right = Vec3::X;
        }
        let up = right.cross(forward).normalize_or_zero();
        (right, up)
    }

    /// Ray through the screen center.
    pub fn crosshair_ray(&self) -> Ray {
        Ray::new(self.position, self.forward_direction())
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        let view = Mat4::look_to_rh(self.position, self.forward_direction(), Vec3::Y);
        let projection = Mat4::perspective_rh(
            self.fov,
            self.aspect.max(0.0001),
            self.near.max(0.0001),
            self.far.max(self.near + 0.0001),
        );

        projection * view
    }
}
