#![allow(dead_code)]

use cgmath::{Matrix4, Vector3};
use glade::{
    camera::Camera,
    config::CameraConfig,
    data_structures::{
        entity::Entity,
        handle::Handle,
        model::{Material, RenderableModel},
        terrain::TerrainTile,
    },
    render::{GraphicsContext, ShaderPass, SharedUniforms},
};

/// One call the renderer made, with just enough payload to assert on.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Prepare(Vector3<f32>),
    EnableDepthTest,
    SetCulling(bool),
    UseProgram(Option<ShaderPass>),
    LoadShared(Option<ShaderPass>),
    BindModel(usize),
    BindTerrain(i32, i32),
    Draw(Matrix4<f32>),
    Unbind,
}

/// A [`GraphicsContext`] that only writes down what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub commands: Vec<Command>,
    pub culling: bool,
    program: Option<ShaderPass>,
    pub last_uniforms: Option<SharedUniforms>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw(_)))
            .count()
    }

    pub fn model_binds(&self) -> Vec<usize> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::BindModel(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Number of draws between each bind and its unbind, in bind order.
    pub fn draws_per_bind(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        let mut current: Option<usize> = None;
        for command in &self.commands {
            match command {
                Command::BindModel(_) | Command::BindTerrain(..) => current = Some(0),
                Command::Draw(_) => {
                    if let Some(n) = current.as_mut() {
                        *n += 1;
                    }
                }
                Command::Unbind => counts.extend(current.take()),
                _ => {}
            }
        }
        counts
    }
}

impl GraphicsContext for RecordingContext {
    fn prepare(&mut self, sky: Vector3<f32>) {
        self.commands.push(Command::Prepare(sky));
    }

    fn enable_depth_test(&mut self) {
        self.commands.push(Command::EnableDepthTest);
    }

    fn set_culling(&mut self, enabled: bool) {
        self.culling = enabled;
        self.commands.push(Command::SetCulling(enabled));
    }

    fn culling_enabled(&self) -> bool {
        self.culling
    }

    fn use_program(&mut self, pass: Option<ShaderPass>) {
        self.program = pass;
        self.commands.push(Command::UseProgram(pass));
    }

    fn load_shared(&mut self, uniforms: &SharedUniforms) {
        self.last_uniforms = Some(*uniforms);
        self.commands.push(Command::LoadShared(self.program));
    }

    fn bind_model(&mut self, model: &RenderableModel) {
        self.commands.push(Command::BindModel(model.id.index()));
    }

    fn bind_terrain(&mut self, terrain: &TerrainTile) {
        self.commands
            .push(Command::BindTerrain(terrain.grid_x, terrain.grid_z));
    }

    fn draw(&mut self, transform: Matrix4<f32>) {
        self.commands.push(Command::Draw(transform));
    }

    fn unbind(&mut self) {
        self.commands.push(Command::Unbind);
    }
}

pub fn model(id: usize, material: Material) -> RenderableModel {
    RenderableModel::new(Handle::new(id), Handle::new(id), Handle::new(id), 36, material)
}

pub fn entity_at(model: RenderableModel, x: f32, z: f32) -> Entity {
    Entity::new(model, Vector3::new(x, 0.0, z), 0.0, 0.0, 0.0, 1.0)
}

pub fn terrain(grid_x: i32, grid_z: i32) -> TerrainTile {
    TerrainTile::new(grid_x, grid_z, Handle::new(100), 6, Handle::new(0))
}

pub fn camera_behind(target: &Entity) -> Camera {
    let mut camera = Camera::new(&CameraConfig::default());
    camera.update(target, &Default::default());
    camera
}
