use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Orthographic 2D camera described in world units rather than pixels, so the
/// visible area stays fixed whatever the window size.
pub struct Camera2D {
    pub position: Vec2,
    pub half_extents: Vec2,
}

impl Camera2D {
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            half_extents: Vec2::new(half_width, half_height),
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_extents.x,
            self.half_extents.x,
            -self.half_extents.y,
            self.half_extents.y,
            -1.0,
            1.0,
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position.extend(0.0))
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: (self.projection() * self.view()).to_cols_array_2d(),
        }
    }
}
