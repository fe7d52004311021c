//! One frame, start to finish.
//!
//! [`MasterRenderer::render`] clears the target, runs the entity pass and
//! then the terrain pass, and leaves the batch collector empty. The order is
//! fixed: both passes rely on the depth and culling state set up at the start.
//!
//! Nothing is depth sorted. Depth testing resolves visibility of opaque
//! geometry, and alpha-tested foliage discards its transparent texels in the
//! fragment shader, so blended transparency is not supported.

use cgmath::{Deg, Matrix4, Vector3};

use crate::{
    camera::{Camera, Projection},
    config::RenderConfig,
    data_structures::light::Light,
    render::{Drawable, Fog, GraphicsContext, ShaderPass, SharedUniforms, batch::BatchCollector},
};

#[derive(Clone, Debug)]
pub struct MasterRenderer {
    projection: Projection,
    sky_colour: Vector3<f32>,
    fog: Fog,
}

impl MasterRenderer {
    pub fn new(config: &RenderConfig, width: u32, height: u32) -> Self {
        let projection = Projection::new(
            width,
            height,
            Deg(config.fov),
            config.near_plane,
            config.far_plane,
        );
        Self {
            projection,
            sky_colour: config.sky_colour.into(),
            fog: Fog {
                density: config.fog_density,
                gradient: config.fog_gradient,
            },
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.calc_matrix()
    }

    pub fn sky_colour(&self) -> Vector3<f32> {
        self.sky_colour
    }

    /// Draw both sides of every face, e.g. for foliage quads.
    pub fn disable_culling<G: GraphicsContext + ?Sized>(gfx: &mut G) {
        gfx.set_culling(false);
    }

    /// Only draw faces pointing towards the camera.
    pub fn enable_culling<G: GraphicsContext + ?Sized>(gfx: &mut G) {
        gfx.set_culling(true);
    }

    pub fn shared_uniforms(&self, light: &Light, camera: &Camera) -> SharedUniforms {
        SharedUniforms {
            view: camera.view_matrix(),
            projection: self.projection.calc_matrix(),
            light: *light,
            sky_colour: self.sky_colour,
            fog: self.fog,
        }
    }

    /// Renders everything in `batch` and empties it.
    pub fn render<G: GraphicsContext + ?Sized>(
        &self,
        gfx: &mut G,
        batch: &mut BatchCollector<'_>,
        light: &Light,
        camera: &Camera,
    ) {
        let uniforms = self.shared_uniforms(light, camera);
        let entities = batch.drain_entities();
        let terrains = batch.drain_terrain();
        log::trace!(
            "frame: {} entity batches, {} terrain tiles",
            entities.len(),
            terrains.len()
        );

        gfx.prepare(self.sky_colour);
        gfx.enable_depth_test();
        Self::enable_culling(gfx);

        gfx.use_program(Some(ShaderPass::Entity));
        gfx.load_shared(&uniforms);
        for entity_batch in &entities {
            entity_batch.render(gfx);
        }

        gfx.use_program(Some(ShaderPass::Terrain));
        gfx.load_shared(&uniforms);
        for terrain in terrains {
            terrain.render(gfx);
        }

        gfx.use_program(None);
    }
}
