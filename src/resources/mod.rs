//! Loading assets from disk and owning everything that was uploaded.
//!
//! The [`AssetStore`] is the only owner of GPU geometry and textures. Scene
//! code holds [`Handle`]s into it, so dropping the store releases every mesh
//! and texture of the scene in one place.

use std::path::PathBuf;

use thiserror::Error;

use crate::{
    data_structures::{
        handle::Handle,
        model::{Material, Mesh, RenderableModel},
        terrain::{self, HeightMap, TerrainMaterial, TerrainTexturePack, TerrainTile},
        texture::{Texture, TextureKind},
    },
    pipelines::{Layouts, entity::MaterialBinding, terrain::mk_terrain_bind_group},
};

pub mod mesh;
pub mod texture;

pub use texture::{load_binary, load_string};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("asset {0:?} not found")]
    NotFound(PathBuf),
    #[error("failed to read asset {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image `{name}`")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to parse OBJ `{name}`")]
    Obj {
        name: String,
        #[source]
        source: tobj::LoadError,
    },
    #[error("model `{0}` contains no triangles")]
    EmptyMesh(String),
}

pub struct AssetStore {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layouts: Layouts,
    meshes: Vec<Mesh>,
    textures: Vec<Texture>,
    materials: Vec<MaterialBinding>,
    terrain_materials: Vec<TerrainMaterial>,
}

impl AssetStore {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, layouts: &Layouts) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            layouts: Layouts {
                globals: layouts.globals.clone(),
                material: layouts.material.clone(),
                terrain: layouts.terrain.clone(),
            },
            meshes: Vec::new(),
            textures: Vec::new(),
            materials: Vec::new(),
            terrain_materials: Vec::new(),
        }
    }

    pub fn add_texture(
        &mut self,
        img: &image::DynamicImage,
        name: &str,
        kind: TextureKind,
    ) -> Handle<Texture> {
        let texture = Texture::from_image(&self.device, &self.queue, img, Some(name), kind);
        self.textures.push(texture);
        Handle::new(self.textures.len() - 1)
    }

    pub fn add_mesh(&mut self, name: &str, data: &mesh::ModelData) -> Result<Handle<Mesh>, LoadError> {
        if data.is_empty() {
            return Err(LoadError::EmptyMesh(name.to_string()));
        }
        let mesh = mesh::upload_mesh(&self.device, name, &data.vertices, &data.indices);
        log::debug!(
            "uploaded mesh {name}: {} vertices, {} indices",
            data.vertices.len(),
            data.indices.len()
        );
        self.meshes.push(mesh);
        Ok(Handle::new(self.meshes.len() - 1))
    }

    /// Pairs a mesh with a texture and material. Every call yields a model
    /// with a fresh id, i.e. a batch of its own.
    pub fn add_model(
        &mut self,
        mesh: Handle<Mesh>,
        texture: Handle<Texture>,
        material: Material,
    ) -> Option<RenderableModel> {
        let index_count = self.mesh(mesh)?.num_elements;
        let binding = MaterialBinding::new(
            &self.device,
            &self.layouts.material,
            self.texture(texture)?,
            &material,
            &format!("model {} material", self.materials.len()),
        );
        self.materials.push(binding);
        Some(RenderableModel::new(
            Handle::new(self.materials.len() - 1),
            mesh,
            texture,
            index_count,
            material,
        ))
    }

    pub fn add_terrain_material(
        &mut self,
        pack: TerrainTexturePack,
        blend_map: Handle<Texture>,
    ) -> Option<Handle<TerrainMaterial>> {
        let textures = [
            self.texture(pack.background)?,
            self.texture(pack.r)?,
            self.texture(pack.g)?,
            self.texture(pack.b)?,
            self.texture(blend_map)?,
        ];
        let bind_group = mk_terrain_bind_group(
            &self.device,
            &self.layouts.terrain,
            textures,
            "terrain material",
        );
        self.terrain_materials.push(TerrainMaterial { bind_group });
        Some(Handle::new(self.terrain_materials.len() - 1))
    }

    /// Generates and uploads the geometry of the tile at grid cell
    /// `(grid_x, grid_z)`.
    pub fn add_terrain(
        &mut self,
        grid_x: i32,
        grid_z: i32,
        material: Handle<TerrainMaterial>,
        heights: &HeightMap,
    ) -> Result<TerrainTile, LoadError> {
        let data = terrain::generate_terrain(terrain::VERTEX_COUNT, terrain::SIZE, heights);
        let data = mesh::ModelData {
            vertices: data.vertices,
            indices: data.indices,
        };
        let name = format!("terrain ({grid_x}, {grid_z})");
        let mesh = self.add_mesh(&name, &data)?;
        Ok(TerrainTile::new(
            grid_x,
            grid_z,
            mesh,
            data.indices.len() as u32,
            material,
        ))
    }

    pub async fn load_texture(&mut self, name: &str, kind: TextureKind) -> Result<Handle<Texture>, LoadError> {
        let img = texture::load_image(name).await?;
        Ok(self.add_texture(&img, name, kind))
    }

    /// Loads `<obj_name>.obj` and `<texture_name>.png` into one model.
    pub async fn load_model(
        &mut self,
        obj_name: &str,
        texture_name: &str,
        material: Material,
    ) -> anyhow::Result<RenderableModel> {
        let file_name = format!("{obj_name}.obj");
        let (text, img) = futures::try_join!(
            load_string(&file_name),
            texture::load_image(texture_name)
        )?;
        let data = mesh::parse_obj(&file_name, &text)?;
        let mesh = self.add_mesh(&file_name, &data)?;
        let texture = self.add_texture(&img, texture_name, TextureKind::Colour);
        self.add_model(mesh, texture, material)
            .ok_or_else(|| anyhow::anyhow!("model {obj_name} references unknown assets"))
    }

    pub fn mesh(&self, handle: Handle<Mesh>) -> Option<&Mesh> {
        self.meshes.get(handle.index())
    }

    pub fn texture(&self, handle: Handle<Texture>) -> Option<&Texture> {
        self.textures.get(handle.index())
    }

    pub fn material(&self, model: Handle<RenderableModel>) -> Option<&MaterialBinding> {
        self.materials.get(model.index())
    }

    pub fn terrain_material(&self, handle: Handle<TerrainMaterial>) -> Option<&TerrainMaterial> {
        self.terrain_materials.get(handle.index())
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl Drop for AssetStore {
    fn drop(&mut self) {
        log::info!(
            "releasing {} meshes and {} textures",
            self.meshes.len(),
            self.textures.len()
        );
        // Geometry first, then the bind groups and the textures they sample.
        self.meshes.clear();
        self.materials.clear();
        self.terrain_materials.clear();
        self.textures.clear();
    }
}
