//! Renderable geometry and materials.
//!
//! A [`Mesh`] is the GPU side of a model (vertex + index buffer) and lives in
//! the asset store. A [`RenderableModel`] is the cheap, immutable handle bundle
//! entities carry around: which mesh, which texture and how to shade it.

use crate::data_structures::{handle::Handle, texture::Texture};

/// Describes how the bytes of a GPU vertex type map to shader locations.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Uploaded geometry. Owned by the asset store, released when the store drops.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

/// Shading parameters of a textured model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub shine_damper: f32,
    pub reflectivity: f32,
    /// Alpha-tested geometry (foliage). Drawn with back-face culling off.
    pub has_transparency: bool,
    /// Shade as if every normal pointed straight up. Used for grass quads.
    pub use_fake_lighting: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shine_damper: 1.0,
            reflectivity: 0.0,
            has_transparency: false,
            use_fake_lighting: false,
        }
    }
}

impl Material {
    pub fn transparent(mut self) -> Self {
        self.has_transparency = true;
        self
    }

    pub fn fake_lighting(mut self) -> Self {
        self.use_fake_lighting = true;
        self
    }

    pub fn shiny(mut self, shine_damper: f32, reflectivity: f32) -> Self {
        self.shine_damper = shine_damper;
        self.reflectivity = reflectivity;
        self
    }
}

/// Geometry paired with a material, resident on the GPU.
///
/// Entities sharing the same `id` are drawn as one batch. The value itself is
/// just handles, so copying it never duplicates GPU memory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderableModel {
    pub id: Handle<RenderableModel>,
    pub mesh: Handle<Mesh>,
    pub texture: Handle<Texture>,
    pub index_count: u32,
    pub material: Material,
}

impl RenderableModel {
    pub fn new(
        id: Handle<RenderableModel>,
        mesh: Handle<Mesh>,
        texture: Handle<Texture>,
        index_count: u32,
        material: Material,
    ) -> Self {
        Self {
            id,
            mesh,
            texture,
            index_count,
            material,
        }
    }
}
