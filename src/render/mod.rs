//! Frame orchestration: batching, pass ordering and the graphics API seam.
//!
//! The renderer never touches wgpu directly. It drives a [`GraphicsContext`],
//! which the wgpu backend ([`wgpu_frame::WgpuFrame`]) implements by recording
//! into a render pass. Anything else implementing the trait (a recorder in
//! tests, a headless counter) sees the exact same call sequence.
//!
//! # Key types
//!
//! - [`batch::BatchCollector`] per-frame accumulator of entities and terrain
//! - [`master::MasterRenderer`] runs one frame in a fixed pass order
//! - [`Drawable`] the bind / draw / unbind capability of a batch or tile

use cgmath::{Matrix4, Vector3};

use crate::data_structures::{light::Light, model::RenderableModel, terrain::TerrainTile};

pub mod batch;
pub mod master;
pub mod wgpu_frame;

/// The two shader programs of the demo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderPass {
    Entity,
    Terrain,
}

/// Exponential fog: `visibility = exp(-(distance * density) ^ gradient)`,
/// evaluated per vertex from eye-space depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub density: f32,
    pub gradient: f32,
}

/// Uniforms uploaded once per pass and shared by every draw in it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharedUniforms {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub light: Light,
    pub sky_colour: Vector3<f32>,
    pub fog: Fog,
}

/// The graphics API as seen by the renderer.
///
/// Calls arrive in frame order. None of them can fail: invalid handles or
/// missing programs are configuration errors caught while loading.
pub trait GraphicsContext {
    /// Clear colour and depth; `sky` is the clear colour.
    fn prepare(&mut self, sky: Vector3<f32>);
    fn enable_depth_test(&mut self);
    fn set_culling(&mut self, enabled: bool);
    fn culling_enabled(&self) -> bool;
    /// Activate a program, or deactivate the current one with `None`.
    fn use_program(&mut self, pass: Option<ShaderPass>);
    /// Upload the shared uniforms to the active program.
    fn load_shared(&mut self, uniforms: &SharedUniforms);
    /// Bind a model's geometry, texture and material.
    fn bind_model(&mut self, model: &RenderableModel);
    /// Bind a terrain tile's geometry and its blend textures.
    fn bind_terrain(&mut self, terrain: &TerrainTile);
    /// One draw call of the bound geometry with the given world transform.
    fn draw(&mut self, transform: Matrix4<f32>);
    /// Release whatever `bind_model` / `bind_terrain` bound.
    fn unbind(&mut self);
}

/// Something that can be drawn with one bind / unbind cycle.
pub trait Drawable {
    fn bind<G: GraphicsContext + ?Sized>(&self, gfx: &mut G);
    fn draw_instances<G: GraphicsContext + ?Sized>(&self, gfx: &mut G);
    fn unbind<G: GraphicsContext + ?Sized>(&self, gfx: &mut G);

    fn render<G: GraphicsContext + ?Sized>(&self, gfx: &mut G) {
        self.bind(gfx);
        self.draw_instances(gfx);
        self.unbind(gfx);
    }
}

impl Drawable for TerrainTile {
    fn bind<G: GraphicsContext + ?Sized>(&self, gfx: &mut G) {
        gfx.bind_terrain(self);
    }

    fn draw_instances<G: GraphicsContext + ?Sized>(&self, gfx: &mut G) {
        gfx.draw(self.transformation_matrix());
    }

    fn unbind<G: GraphicsContext + ?Sized>(&self, gfx: &mut G) {
        gfx.unbind();
    }
}
