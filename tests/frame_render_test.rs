use cgmath::Vector3;
use glade::{
    config::RenderConfig,
    data_structures::{light::Light, model::Material},
    render::{
        GraphicsContext, ShaderPass, batch::BatchCollector, master::MasterRenderer,
    },
};

use crate::common::test_utils::{
    Command, RecordingContext, camera_behind, entity_at, model, terrain,
};
mod common;

fn renderer() -> MasterRenderer {
    MasterRenderer::new(&RenderConfig::default(), 1280, 720)
}

#[test]
fn empty_frame_clears_and_draws_nothing() {
    let player = entity_at(model(0, Material::default()), 0.0, -50.0);
    let camera = camera_behind(&player);
    let mut gfx = RecordingContext::new();
    let mut batch = BatchCollector::new();

    renderer().render(&mut gfx, &mut batch, &Light::default(), &camera);

    assert_eq!(gfx.draws(), 0);
    assert!(gfx.model_binds().is_empty());
    assert_eq!(
        gfx.commands,
        vec![
            Command::Prepare(Vector3::new(0.5, 0.5, 0.5)),
            Command::EnableDepthTest,
            Command::SetCulling(true),
            Command::UseProgram(Some(ShaderPass::Entity)),
            Command::LoadShared(Some(ShaderPass::Entity)),
            Command::UseProgram(Some(ShaderPass::Terrain)),
            Command::LoadShared(Some(ShaderPass::Terrain)),
            Command::UseProgram(None),
        ]
    );
    assert!(batch.is_empty());
}

#[test]
fn entities_sharing_a_model_are_drawn_under_one_bind() {
    let a = model(1, Material::default());
    let b = model(2, Material::default());
    let entities = [
        entity_at(a, 0.0, 0.0),
        entity_at(b, 1.0, 0.0),
        entity_at(a, 2.0, 0.0),
        entity_at(b, 3.0, 0.0),
        entity_at(a, 4.0, 0.0),
    ];
    let camera = camera_behind(&entities[0]);
    let mut gfx = RecordingContext::new();
    let mut batch = BatchCollector::new();
    batch.submit_entities(&entities);
    assert_eq!(batch.group_count(), 2);

    renderer().render(&mut gfx, &mut batch, &Light::default(), &camera);

    assert_eq!(gfx.model_binds(), vec![1, 2]);
    assert_eq!(gfx.draws_per_bind(), vec![3, 2]);
    assert_eq!(gfx.draws(), 5);
    assert!(batch.is_empty());
}

#[test]
fn every_entity_is_drawn_with_its_own_transform() {
    let a = model(1, Material::default());
    let entities = [entity_at(a, 10.0, -5.0), entity_at(a, -3.0, 7.0)];
    let camera = camera_behind(&entities[0]);
    let mut gfx = RecordingContext::new();
    let mut batch = BatchCollector::new();
    batch.submit_entities(&entities);

    renderer().render(&mut gfx, &mut batch, &Light::default(), &camera);

    let drawn: Vec<_> = gfx
        .commands
        .iter()
        .filter_map(|c| match c {
            Command::Draw(m) => Some(*m),
            _ => None,
        })
        .collect();
    let expected: Vec<_> = entities.iter().map(|e| e.transformation_matrix()).collect();
    assert_eq!(drawn, expected);
}

#[test]
fn submitting_an_entity_twice_draws_it_twice() {
    let e = entity_at(model(4, Material::default()), 0.0, 0.0);
    let camera = camera_behind(&e);
    let mut gfx = RecordingContext::new();
    let mut batch = BatchCollector::new();
    batch.submit_entity(&e);
    batch.submit_entity(&e);

    renderer().render(&mut gfx, &mut batch, &Light::default(), &camera);

    assert_eq!(gfx.model_binds(), vec![4]);
    assert_eq!(gfx.draws_per_bind(), vec![2]);
}

#[test]
fn transparent_models_are_drawn_without_culling() {
    let fern = model(1, Material::default().transparent());
    let tree = model(2, Material::default());
    let entities = [entity_at(fern, 0.0, 0.0), entity_at(tree, 1.0, 0.0)];
    let camera = camera_behind(&entities[0]);
    let mut gfx = RecordingContext::new();
    let mut batch = BatchCollector::new();
    batch.submit_entities(&entities);

    renderer().render(&mut gfx, &mut batch, &Light::default(), &camera);

    let bind_fern = gfx
        .commands
        .iter()
        .position(|c| *c == Command::BindModel(1))
        .unwrap();
    assert_eq!(gfx.commands[bind_fern - 1], Command::SetCulling(false));

    let bind_tree = gfx
        .commands
        .iter()
        .position(|c| *c == Command::BindModel(2))
        .unwrap();
    let culling_before_tree = gfx.commands[..bind_tree]
        .iter()
        .rev()
        .find_map(|c| match c {
            Command::SetCulling(on) => Some(*on),
            _ => None,
        });
    assert_eq!(culling_before_tree, Some(true));
    assert!(gfx.culling_enabled());
}

#[test]
fn culling_toggled_from_outside_is_restored_by_the_next_frame() {
    let e = entity_at(model(0, Material::default()), 0.0, 0.0);
    let camera = camera_behind(&e);
    let mut gfx = RecordingContext::new();
    let renderer = renderer();

    MasterRenderer::disable_culling(&mut gfx);
    MasterRenderer::enable_culling(&mut gfx);
    let before = gfx.culling_enabled();

    let mut batch = BatchCollector::new();
    batch.submit_entity(&e);
    renderer.render(&mut gfx, &mut batch, &Light::default(), &camera);
    assert_eq!(gfx.culling_enabled(), before);

    MasterRenderer::disable_culling(&mut gfx);
    let mut batch = BatchCollector::new();
    batch.submit_entity(&e);
    renderer.render(&mut gfx, &mut batch, &Light::default(), &camera);
    assert!(gfx.culling_enabled());
}

#[test]
fn terrain_is_drawn_in_the_terrain_pass_after_entities() {
    let e = entity_at(model(0, Material::default()), 0.0, 0.0);
    let tiles = [terrain(0, -1), terrain(-1, -1)];
    let camera = camera_behind(&e);
    let mut gfx = RecordingContext::new();
    let mut batch = BatchCollector::new();
    for tile in &tiles {
        batch.submit_terrain(tile);
    }
    batch.submit_entity(&e);

    renderer().render(&mut gfx, &mut batch, &Light::default(), &camera);

    let terrain_program = gfx
        .commands
        .iter()
        .position(|c| *c == Command::UseProgram(Some(ShaderPass::Terrain)))
        .unwrap();
    let entity_bind = gfx
        .commands
        .iter()
        .position(|c| *c == Command::BindModel(0))
        .unwrap();
    assert!(entity_bind < terrain_program);

    let terrain_binds: Vec<_> = gfx.commands[terrain_program..]
        .iter()
        .filter_map(|c| match c {
            Command::BindTerrain(x, z) => Some((*x, *z)),
            _ => None,
        })
        .collect();
    assert_eq!(terrain_binds, vec![(0, -1), (-1, -1)]);
    assert_eq!(gfx.draws_per_bind(), vec![1, 1, 1]);
    assert_eq!(gfx.commands.last(), Some(&Command::UseProgram(None)));
    assert!(batch.is_empty());
}

#[test]
fn both_passes_see_the_same_uniforms() {
    let e = entity_at(model(0, Material::default()), 0.0, -50.0);
    let camera = camera_behind(&e);
    let light = Light::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.2, 0.4, 0.6));
    let renderer = renderer();
    let mut gfx = RecordingContext::new();
    let mut batch = BatchCollector::new();

    renderer.render(&mut gfx, &mut batch, &light, &camera);

    let uniforms = gfx.last_uniforms.unwrap();
    assert_eq!(uniforms, renderer.shared_uniforms(&light, &camera));
    assert_eq!(uniforms.view, camera.view_matrix());
    assert_eq!(uniforms.projection, renderer.projection_matrix());
    assert_eq!(uniforms.light, light);
}
