//! Height-mapped terrain tiles.
//!
//! A tile covers `size x size` world units starting at `grid * size` on the
//! x/z plane. Its geometry is generated once on the CPU ([`generate_terrain`])
//! and uploaded to the asset store; the tile itself only keeps handles.

use cgmath::{InnerSpace, Matrix4, Vector3};
use image::DynamicImage;

use crate::data_structures::{
    handle::Handle,
    model::{Mesh, ModelVertex},
    texture::Texture,
};

/// Side length of a tile in world units.
pub const SIZE: f32 = 800.0;
/// Vertices along one side of a tile.
pub const VERTEX_COUNT: usize = 128;
/// Largest absolute height an image height map can produce.
pub const MAX_HEIGHT: f32 = 40.0;

/// The ground textures blended by the terrain shader.
///
/// Black areas of the blend map show `background`, red/green/blue areas show
/// the matching texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainTexturePack {
    pub background: Handle<Texture>,
    pub r: Handle<Texture>,
    pub g: Handle<Texture>,
    pub b: Handle<Texture>,
}

/// Marker for the GPU bind group holding a pack plus its blend map.
#[derive(Debug)]
pub struct TerrainMaterial {
    pub bind_group: wgpu::BindGroup,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TerrainTile {
    pub grid_x: i32,
    pub grid_z: i32,
    pub x: f32,
    pub z: f32,
    pub mesh: Handle<Mesh>,
    pub index_count: u32,
    pub material: Handle<TerrainMaterial>,
}

impl TerrainTile {
    pub fn new(
        grid_x: i32,
        grid_z: i32,
        mesh: Handle<Mesh>,
        index_count: u32,
        material: Handle<TerrainMaterial>,
    ) -> Self {
        Self {
            grid_x,
            grid_z,
            x: grid_x as f32 * SIZE,
            z: grid_z as f32 * SIZE,
            mesh,
            index_count,
            material,
        }
    }

    /// Terrain is never rotated or scaled, only moved to its grid cell.
    pub fn transformation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(self.x, 0.0, self.z))
    }
}

/// Heights sampled on a regular grid.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    width: usize,
    depth: usize,
    heights: Vec<f32>,
}

impl HeightMap {
    pub fn flat() -> Self {
        Self {
            width: 1,
            depth: 1,
            heights: vec![0.0],
        }
    }

    /// Brightness maps to height: black is `-max_height`, white is `max_height`.
    pub fn from_image(img: &DynamicImage, max_height: f32) -> Self {
        let luma = img.to_luma8();
        let (width, depth) = luma.dimensions();
        let heights = luma
            .pixels()
            .map(|p| (p.0[0] as f32 / 255.0 * 2.0 - 1.0) * max_height)
            .collect();
        Self::from_heights(width as usize, depth as usize, heights)
    }

    pub fn from_fn(width: usize, depth: usize, f: impl Fn(usize, usize) -> f32) -> Self {
        let heights = (0..depth)
            .flat_map(|z| (0..width).map(move |x| (x, z)))
            .map(|(x, z)| f(x, z))
            .collect();
        Self::from_heights(width, depth, heights)
    }

    /// An empty grid is flat ground.
    fn from_heights(width: usize, depth: usize, heights: Vec<f32>) -> Self {
        if heights.is_empty() {
            return Self::flat();
        }
        Self {
            width,
            depth,
            heights,
        }
    }

    /// Height at grid vertex `(x, z)` of a `vertex_count`-wide grid.
    /// Out-of-range vertices clamp to the border.
    pub fn sample(&self, x: isize, z: isize, vertex_count: usize) -> f32 {
        let last = vertex_count.saturating_sub(1).max(1) as f32;
        let x = x.clamp(0, vertex_count as isize - 1) as f32 / last;
        let z = z.clamp(0, vertex_count as isize - 1) as f32 / last;
        let ix = (x * (self.width - 1) as f32).round() as usize;
        let iz = (z * (self.depth - 1) as f32).round() as usize;
        self.heights[iz * self.width + ix]
    }
}

/// CPU-side terrain geometry ready for upload.
#[derive(Clone, Debug, Default)]
pub struct TerrainMeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

/// Builds a `vertex_count x vertex_count` grid spanning `size` units.
///
/// Texture coordinates run from 0 to 1 across the tile so the blend map covers
/// it exactly once. Each cell becomes two counter-clockwise triangles.
pub fn generate_terrain(vertex_count: usize, size: f32, heights: &HeightMap) -> TerrainMeshData {
    let n = vertex_count.max(2);
    let last = (n - 1) as f32;
    let cell = size / last;

    let mut vertices = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let (x, z) = (j as isize, i as isize);
            let height = heights.sample(x, z, n);
            let left = heights.sample(x - 1, z, n);
            let right = heights.sample(x + 1, z, n);
            let down = heights.sample(x, z - 1, n);
            let up = heights.sample(x, z + 1, n);
            let normal = Vector3::new(left - right, 2.0 * cell, down - up).normalize();
            vertices.push(ModelVertex {
                position: [j as f32 / last * size, height, i as f32 / last * size],
                tex_coords: [j as f32 / last, i as f32 / last],
                normal: normal.into(),
            });
        }
    }

    let mut indices = Vec::with_capacity(6 * (n - 1) * (n - 1));
    for gz in 0..n - 1 {
        for gx in 0..n - 1 {
            let top_left = (gz * n + gx) as u32;
            let top_right = top_left + 1;
            let bottom_left = ((gz + 1) * n + gx) as u32;
            let bottom_right = bottom_left + 1;
            indices.extend_from_slice(&[
                top_left,
                bottom_left,
                top_right,
                top_right,
                bottom_left,
                bottom_right,
            ]);
        }
    }

    TerrainMeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_terrain_has_expected_counts_and_upward_normals() {
        let mesh = generate_terrain(4, 30.0, &HeightMap::flat());
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.indices.len(), 6 * 9);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(mesh.vertices.iter().all(|v| v.position[1] == 0.0));
        assert_eq!(mesh.vertices[15].position, [30.0, 0.0, 30.0]);
        assert_eq!(mesh.vertices[15].tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = generate_terrain(8, SIZE, &HeightMap::flat());
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn first_cell_faces_up() {
        let mesh = generate_terrain(2, 1.0, &HeightMap::flat());
        let p = |i: u32| Vector3::from(mesh.vertices[i as usize].position);
        let (a, b, c) = (p(mesh.indices[0]), p(mesh.indices[1]), p(mesh.indices[2]));
        assert!((b - a).cross(c - a).y > 0.0);
    }

    #[test]
    fn slope_tilts_normals_downhill() {
        // height rises with x, so normals lean towards -x
        let heights = HeightMap::from_fn(4, 4, |x, _| x as f32 * 10.0);
        let mesh = generate_terrain(4, 30.0, &heights);
        let normal = mesh.vertices[5].normal;
        assert!(normal[0] < 0.0);
        assert!(normal[1] > 0.0);
        assert!(normal[2].abs() < 1e-6);
    }

    #[test]
    fn image_height_map_spans_plus_minus_max_height() {
        let img = image::GrayImage::from_fn(2, 1, |x, _| image::Luma([if x == 0 { 0 } else { 255 }]));
        let heights = HeightMap::from_image(&DynamicImage::ImageLuma8(img), MAX_HEIGHT);
        assert_eq!(heights.sample(0, 0, 2), -MAX_HEIGHT);
        assert_eq!(heights.sample(1, 0, 2), MAX_HEIGHT);
    }

    #[test]
    fn empty_height_maps_are_flat() {
        let empty = HeightMap::from_fn(0, 0, |_, _| 7.0);
        assert_eq!(empty, HeightMap::flat());
        assert_eq!(HeightMap::from_fn(3, 0, |_, _| 7.0), HeightMap::flat());

        let mesh = generate_terrain(4, 10.0, &empty);
        assert_eq!(mesh.vertices.len(), 16);
        assert!(mesh.vertices.iter().all(|v| v.position[1] == 0.0));

        let img = DynamicImage::ImageLuma8(image::GrayImage::new(0, 0));
        assert_eq!(HeightMap::from_image(&img, MAX_HEIGHT), HeightMap::flat());
    }

    #[test]
    fn tile_origin_follows_grid() {
        let tile = TerrainTile::new(-1, -1, Handle::new(0), 6, Handle::new(0));
        assert_eq!((tile.x, tile.z), (-SIZE, -SIZE));
    }
}
