use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{mk_render_pipeline, scene_vertex_layouts},
};

const TEXTURE_SLOTS: u32 = 5;

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    }
}

/// Bindings 0..=3 are the background, r, g and b ground textures, 4 is the
/// blend map and 5 the shared sampler.
pub fn mk_terrain_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let mut entries: Vec<_> = (0..TEXTURE_SLOTS).map(texture_entry).collect();
    entries.push(wgpu::BindGroupLayoutEntry {
        binding: TEXTURE_SLOTS,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    });
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &entries,
        label: Some("terrain_bind_group_layout"),
    })
}

pub fn mk_terrain_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    textures: [&Texture; TEXTURE_SLOTS as usize],
    label: &str,
) -> wgpu::BindGroup {
    let mut entries: Vec<_> = textures
        .iter()
        .zip(0..)
        .map(|(texture, binding)| wgpu::BindGroupEntry {
            binding,
            resource: wgpu::BindingResource::TextureView(&texture.view),
        })
        .collect();
    entries.push(wgpu::BindGroupEntry {
        binding: TEXTURE_SLOTS,
        resource: wgpu::BindingResource::Sampler(&textures[0].sampler),
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &entries,
        label: Some(label),
    })
}

pub fn mk_terrain_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    globals_layout: &wgpu::BindGroupLayout,
    terrain_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Terrain Pipeline Layout"),
        bind_group_layouts: &[globals_layout, terrain_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Terrain Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("terrain.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Terrain Pipeline",
        &layout,
        color_format,
        Some(wgpu::Face::Back),
        &scene_vertex_layouts(),
        shader,
    )
}
