//! [`GraphicsContext`] backed by a wgpu render pass.
//!
//! A `WgpuFrame` lives for exactly one frame. `prepare` opens the render pass
//! (clearing colour and depth), every `draw` appends one transform to the
//! instance list and records an indexed draw for it, and [`WgpuFrame::finish`]
//! uploads the transforms and submits the command buffer.

use cgmath::{Matrix4, Vector3};

use crate::{
    data_structures::{entity::InstanceRaw, model::RenderableModel, terrain::TerrainTile},
    pipelines::Pipelines,
    render::{GraphicsContext, ShaderPass, SharedUniforms},
    resources::AssetStore,
};

pub struct WgpuFrame<'a> {
    queue: &'a wgpu::Queue,
    store: &'a AssetStore,
    pipelines: &'a Pipelines,
    target: &'a wgpu::TextureView,
    depth: &'a wgpu::TextureView,
    encoder: Option<wgpu::CommandEncoder>,
    pass: Option<wgpu::RenderPass<'static>>,
    program: Option<ShaderPass>,
    culling: bool,
    instances: Vec<InstanceRaw>,
    bound_indices: Option<u32>,
}

impl<'a> WgpuFrame<'a> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'a wgpu::Queue,
        store: &'a AssetStore,
        pipelines: &'a Pipelines,
        target: &'a wgpu::TextureView,
        depth: &'a wgpu::TextureView,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        Self {
            queue,
            store,
            pipelines,
            target,
            depth,
            encoder: Some(encoder),
            pass: None,
            program: None,
            culling: false,
            instances: Vec::new(),
            bound_indices: None,
        }
    }

    /// Number of draws recorded so far.
    pub fn draw_count(&self) -> usize {
        self.instances.len()
    }

    /// Ends the pass, uploads the recorded transforms and submits.
    pub fn finish(mut self) {
        // The pass has to end before the encoder can be finished.
        self.pass = None;
        if !self.instances.is_empty() {
            self.queue.write_buffer(
                self.pipelines.instance_buffer(),
                0,
                bytemuck::cast_slice(&self.instances),
            );
        }
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }

    fn apply_pipeline(&mut self) {
        let Some(pass) = self.pass.as_mut() else {
            return;
        };
        match self.program {
            Some(ShaderPass::Entity) => {
                pass.set_pipeline(self.pipelines.entity(self.culling));
                pass.set_bind_group(0, &self.pipelines.entity_globals.bind_group, &[]);
            }
            Some(ShaderPass::Terrain) => {
                pass.set_pipeline(self.pipelines.terrain());
                pass.set_bind_group(0, &self.pipelines.terrain_globals.bind_group, &[]);
            }
            None => {}
        }
    }
}

impl GraphicsContext for WgpuFrame<'_> {
    fn prepare(&mut self, sky: Vector3<f32>) {
        self.pass = None;
        let Some(encoder) = self.encoder.as_mut() else {
            return;
        };
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: sky.x as f64,
                            g: sky.y as f64,
                            b: sky.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            })
            .forget_lifetime();
        pass.set_vertex_buffer(1, self.pipelines.instance_buffer().slice(..));
        self.pass = Some(pass);
    }

    fn enable_depth_test(&mut self) {
        // Every scene pipeline already tests against the depth attachment.
    }

    fn set_culling(&mut self, enabled: bool) {
        if self.culling == enabled {
            return;
        }
        self.culling = enabled;
        if self.program == Some(ShaderPass::Entity) {
            self.apply_pipeline();
        }
    }

    fn culling_enabled(&self) -> bool {
        self.culling
    }

    fn use_program(&mut self, pass: Option<ShaderPass>) {
        self.program = pass;
        self.apply_pipeline();
    }

    fn load_shared(&mut self, uniforms: &SharedUniforms) {
        match self.program {
            Some(ShaderPass::Entity) => self.pipelines.entity_globals.write(self.queue, uniforms),
            Some(ShaderPass::Terrain) => self.pipelines.terrain_globals.write(self.queue, uniforms),
            None => log::warn!("shared uniforms loaded without an active program"),
        }
    }

    fn bind_model(&mut self, model: &RenderableModel) {
        let (Some(mesh), Some(material)) =
            (self.store.mesh(model.mesh), self.store.material(model.id))
        else {
            log::warn!("{:?} is not resident, skipping its batch", model.id);
            self.bound_indices = None;
            return;
        };
        let Some(pass) = self.pass.as_mut() else {
            return;
        };
        pass.set_bind_group(1, &material.bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.bound_indices = Some(model.index_count);
    }

    fn bind_terrain(&mut self, terrain: &TerrainTile) {
        let (Some(mesh), Some(material)) = (
            self.store.mesh(terrain.mesh),
            self.store.terrain_material(terrain.material),
        ) else {
            log::warn!(
                "terrain tile ({}, {}) is not resident, skipping it",
                terrain.grid_x,
                terrain.grid_z
            );
            self.bound_indices = None;
            return;
        };
        let Some(pass) = self.pass.as_mut() else {
            return;
        };
        pass.set_bind_group(1, &material.bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.bound_indices = Some(terrain.index_count);
    }

    fn draw(&mut self, transform: Matrix4<f32>) {
        let (Some(index_count), Some(pass)) = (self.bound_indices, self.pass.as_mut()) else {
            return;
        };
        if self.instances.len() >= self.pipelines.instance_capacity() {
            log::warn!("instance buffer full, dropping draw");
            return;
        }
        let instance = self.instances.len() as u32;
        self.instances.push(transform.into());
        pass.draw_indexed(0..index_count, 0, instance..instance + 1);
    }

    fn unbind(&mut self) {
        self.bound_indices = None;
    }
}
