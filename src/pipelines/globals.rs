use cgmath::SquareMatrix;
use wgpu::util::DeviceExt;

use crate::render::SharedUniforms;

/// Per-pass uniforms: camera, projection, light, sky and fog.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    camera_position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    light_position: [f32; 3],
    _padding2: u32,
    light_colour: [f32; 3],
    fog_density: f32,
    sky_colour: [f32; 3],
    fog_gradient: f32,
}

impl From<&SharedUniforms> for GlobalsUniform {
    fn from(uniforms: &SharedUniforms) -> Self {
        // The shaders need the eye position for specular highlights.
        let camera_position = uniforms
            .view
            .invert()
            .map(|inverse| inverse.w.truncate())
            .unwrap_or_else(|| cgmath::Vector3::new(0.0, 0.0, 0.0));
        Self {
            view: uniforms.view.into(),
            projection: uniforms.projection.into(),
            camera_position: camera_position.into(),
            _padding: 0,
            light_position: uniforms.light.position.into(),
            _padding2: 0,
            light_colour: uniforms.light.colour.into(),
            fog_density: uniforms.fog.density,
            sky_colour: uniforms.sky_colour.into(),
            fog_gradient: uniforms.fog.gradient,
        }
    }
}

/// A globals buffer plus the bind group exposing it as group 0.
#[derive(Debug)]
pub struct Globals {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Globals {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = mk_buffer(device, bytemuck::Zeroable::zeroed(), label);
        let bind_group = mk_bind_group(device, layout, &buffer, label);
        Self { buffer, bind_group }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniforms: &SharedUniforms) {
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[GlobalsUniform::from(uniforms)]),
        );
    }
}

pub fn mk_buffer(device: &wgpu::Device, uniform: GlobalsUniform, label: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("globals_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some(label),
    })
}
