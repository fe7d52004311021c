//! Positioned instances of renderable models.
//!
//! Every entity carries its own transform. The renderer turns that transform
//! into an [`InstanceRaw`] which is what actually ends up in the GPU instance
//! buffer for the entity's draw call.

use cgmath::{Deg, Matrix4, Vector3};

use crate::data_structures::model::{self, RenderableModel};

/// A world-space instance of a [`RenderableModel`].
///
/// Rotations are Euler angles in degrees, applied x, then y, then z.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub model: RenderableModel,
    pub position: Vector3<f32>,
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    pub scale: f32,
}

impl Entity {
    pub fn new(
        model: RenderableModel,
        position: Vector3<f32>,
        rot_x: f32,
        rot_y: f32,
        rot_z: f32,
        scale: f32,
    ) -> Self {
        Self {
            model,
            position,
            rot_x,
            rot_y,
            rot_z,
            scale,
        }
    }

    pub fn increase_position(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position += Vector3::new(dx, dy, dz);
    }

    pub fn increase_rotation(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rot_x += dx;
        self.rot_y += dy;
        self.rot_z += dz;
    }

    pub fn transformation_matrix(&self) -> Matrix4<f32> {
        transformation_matrix(
            self.position,
            [self.rot_x, self.rot_y, self.rot_z],
            self.scale,
        )
    }
}

/// translation * Rx * Ry * Rz * scale
pub fn transformation_matrix(
    translation: Vector3<f32>,
    rotation: [f32; 3],
    scale: f32,
) -> Matrix4<f32> {
    Matrix4::from_translation(translation)
        * Matrix4::from_angle_x(Deg(rotation[0]))
        * Matrix4::from_angle_y(Deg(rotation[1]))
        * Matrix4::from_angle_z(Deg(rotation[2]))
        * Matrix4::from_scale(scale)
}

/**
 * The raw instance is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
}

impl From<Matrix4<f32>> for InstanceRaw {
    fn from(matrix: Matrix4<f32>) -> Self {
        Self {
            model: matrix.into(),
        }
    }
}

/**
 * A mat4 takes up 4 vertex slots as it is technically 4 vec4s, one per column.
 * Locations 5..=8 leave room for the per-vertex attributes in front of it.
 */
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // The shader only advances to the next matrix when it starts a new instance
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
