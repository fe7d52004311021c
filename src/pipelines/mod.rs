//! Render pipelines and the GPU state shared by every frame.

use crate::data_structures::entity::InstanceRaw;

pub mod basic;
pub mod entity;
pub mod globals;
pub mod terrain;

/// Bind group layouts, created once per device.
#[derive(Debug)]
pub struct Layouts {
    pub globals: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
    pub terrain: wgpu::BindGroupLayout,
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            globals: globals::mk_bind_group_layout(device),
            material: entity::mk_material_layout(device),
            terrain: terrain::mk_terrain_layout(device),
        }
    }
}

/// Everything a frame needs besides the assets: pipelines, the per-pass
/// uniform buffers and the instance buffer holding every draw's transform.
#[derive(Debug)]
pub struct Pipelines {
    pub layouts: Layouts,
    entity_culled: wgpu::RenderPipeline,
    entity_double_sided: wgpu::RenderPipeline,
    terrain: wgpu::RenderPipeline,
    pub entity_globals: globals::Globals,
    pub terrain_globals: globals::Globals,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
}

impl Pipelines {
    const INITIAL_INSTANCES: usize = 1024;

    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let layouts = Layouts::new(device);
        let entity_culled = entity::mk_entity_pipeline(
            device,
            color_format,
            &layouts.globals,
            &layouts.material,
            Some(wgpu::Face::Back),
        );
        let entity_double_sided = entity::mk_entity_pipeline(
            device,
            color_format,
            &layouts.globals,
            &layouts.material,
            None,
        );
        let terrain =
            terrain::mk_terrain_pipeline(device, color_format, &layouts.globals, &layouts.terrain);
        let entity_globals = globals::Globals::new(device, &layouts.globals, "Entity Globals");
        let terrain_globals = globals::Globals::new(device, &layouts.globals, "Terrain Globals");
        let instance_buffer = mk_instance_buffer(device, Self::INITIAL_INSTANCES);

        Self {
            layouts,
            entity_culled,
            entity_double_sided,
            terrain,
            entity_globals,
            terrain_globals,
            instance_buffer,
            instance_capacity: Self::INITIAL_INSTANCES,
        }
    }

    /// The entity pipeline matching the current culling state.
    pub fn entity(&self, culling: bool) -> &wgpu::RenderPipeline {
        if culling {
            &self.entity_culled
        } else {
            &self.entity_double_sided
        }
    }

    pub fn terrain(&self) -> &wgpu::RenderPipeline {
        &self.terrain
    }

    pub fn instance_buffer(&self) -> &wgpu::Buffer {
        &self.instance_buffer
    }

    pub fn instance_capacity(&self) -> usize {
        self.instance_capacity
    }

    /// Grows the instance buffer so `count` draws fit. Must be called before
    /// a frame starts recording, the buffer can't be replaced mid-pass.
    pub fn reserve_instances(&mut self, device: &wgpu::Device, count: usize) {
        if count <= self.instance_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        log::debug!(
            "growing instance buffer from {} to {} entries",
            self.instance_capacity,
            capacity
        );
        self.instance_buffer = mk_instance_buffer(device, capacity);
        self.instance_capacity = capacity;
    }
}

fn mk_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Instance Buffer"),
        size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
