//! The demo world: a forest on two terrain tiles with a bunny to steer.

use cgmath::Vector3;
use futures::future::try_join_all;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    app::Scene,
    camera::{Camera, CameraController},
    config::Settings,
    data_structures::{
        entity::Entity,
        light::Light,
        model::{Material, RenderableModel},
        terrain::{HeightMap, TerrainTexturePack, TerrainTile},
        texture::TextureKind,
    },
    input::InputState,
    player::Player,
    render::batch::BatchCollector,
    resources::{AssetStore, texture::load_image},
};

/// Seed of the scatter layout, so every run shows the same forest.
const LAYOUT_SEED: u64 = 0x5eed;

/// How many copies of each model are scattered, and at which scale.
struct Scatter {
    model: RenderableModel,
    count: usize,
    scale: f32,
}

pub struct DemoScene {
    entities: Vec<Entity>,
    terrains: Vec<TerrainTile>,
    player: Player,
    camera: Camera,
    controller: CameraController,
    light: Light,
}

impl DemoScene {
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

/// Places `count` copies of `model` on the ground in front of the origin:
/// x in [-400, 400), z in [-600, 0).
pub fn scatter(rng: &mut SmallRng, model: RenderableModel, count: usize, scale: f32) -> Vec<Entity> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(-400.0..400.0);
            let z = rng.gen_range(-600.0..0.0);
            Entity::new(model, Vector3::new(x, 0.0, z), 0.0, 0.0, 0.0, scale)
        })
        .collect()
}

impl Scene for DemoScene {
    async fn load(store: &mut AssetStore, settings: &Settings) -> anyhow::Result<Self> {
        let ground_names = ["grassy", "dirt", "pinkFlowers", "path"];
        let (ground, blend_map) = futures::try_join!(
            try_join_all(ground_names.map(load_image)),
            load_image("blendMap")
        )?;
        let ground: Vec<_> = ground
            .iter()
            .zip(ground_names)
            .map(|(img, name)| store.add_texture(img, name, TextureKind::Colour))
            .collect();
        let [background, r, g, b] = ground[..] else {
            anyhow::bail!("expected 4 terrain textures, got {}", ground.len());
        };
        let pack = TerrainTexturePack { background, r, g, b };
        let blend_map = store.add_texture(&blend_map, "blendMap", TextureKind::Data);
        let terrain_material = store
            .add_terrain_material(pack, blend_map)
            .ok_or_else(|| anyhow::anyhow!("terrain material references unknown textures"))?;

        let foliage = Material::default().transparent().fake_lighting();
        let tree = store.load_model("tree", "tree", Material::default()).await?;
        let fern = store
            .load_model("fern", "fern", Material::default().transparent())
            .await?;
        let grass = store.load_model("grassModel", "grassTexture", foliage).await?;
        // Flowers are the grass quads with another texture.
        let flower_texture = store.load_texture("flower", TextureKind::Colour).await?;
        let flower = store
            .add_model(grass.mesh, flower_texture, foliage)
            .ok_or_else(|| anyhow::anyhow!("flower model references unknown assets"))?;
        let bunny = store
            .load_model("stanfordBunny", "white", Material::default())
            .await?;

        let mut rng = SmallRng::seed_from_u64(LAYOUT_SEED);
        let entities = [
            Scatter { model: tree, count: 500, scale: 5.0 },
            Scatter { model: fern, count: 300, scale: 1.0 },
            Scatter { model: grass, count: 400, scale: 1.0 },
            Scatter { model: flower, count: 100, scale: 1.0 },
        ]
        .into_iter()
        .flat_map(|s| scatter(&mut rng, s.model, s.count, s.scale))
        .collect();

        let flat = HeightMap::flat();
        let terrains = vec![
            store.add_terrain(0, -1, terrain_material, &flat)?,
            store.add_terrain(-1, -1, terrain_material, &flat)?,
        ];

        let player = Player::new(
            Entity::new(bunny, Vector3::new(0.0, 0.0, -50.0), 1.0, 0.0, 0.0, 5.0),
            &settings.player,
        );
        let mut camera = Camera::new(&settings.camera);
        let controller = CameraController::new(&settings.camera);
        camera.update(&player.entity, &Default::default());

        Ok(Self {
            entities,
            terrains,
            player,
            camera,
            controller,
            light: Light::default(),
        })
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        self.camera
            .update(&self.player.entity, &self.controller.input(input));
        self.player.update(input, dt);
    }

    fn submit<'frame>(&'frame self, batch: &mut BatchCollector<'frame>) {
        self.terrains
            .iter()
            .for_each(|terrain| batch.submit_terrain(terrain));
        batch.submit_entities(&self.entities);
        batch.submit_entity(&self.player.entity);
    }

    fn light(&self) -> &Light {
        &self.light
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }
}
