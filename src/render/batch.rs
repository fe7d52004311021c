//! Per-frame submission of entities and terrain.
//!
//! Entities are grouped by the model they reference so the renderer binds a
//! model's geometry and texture once and then issues one draw per entity.
//! Groups keep the order in which their model was first submitted, which makes
//! the draw order of a frame reproducible.
//!
//! The collector borrows what is submitted for `'frame`, so it can't outlive
//! the frame it was filled in, and draining leaves it empty.

use std::collections::HashMap;

use crate::{
    data_structures::{
        entity::Entity,
        handle::Handle,
        model::RenderableModel,
        terrain::TerrainTile,
    },
    render::{Drawable, GraphicsContext},
};

/// All entities of one frame that share a [`RenderableModel`].
#[derive(Debug)]
pub struct EntityBatch<'frame> {
    pub model: RenderableModel,
    pub entities: Vec<&'frame Entity>,
}

impl Drawable for EntityBatch<'_> {
    fn bind<G: GraphicsContext + ?Sized>(&self, gfx: &mut G) {
        if self.model.material.has_transparency {
            gfx.set_culling(false);
        }
        gfx.bind_model(&self.model);
    }

    fn draw_instances<G: GraphicsContext + ?Sized>(&self, gfx: &mut G) {
        for entity in &self.entities {
            gfx.draw(entity.transformation_matrix());
        }
    }

    fn unbind<G: GraphicsContext + ?Sized>(&self, gfx: &mut G) {
        // Foliage turned culling off in bind; the next batch may be opaque.
        gfx.set_culling(true);
        gfx.unbind();
    }
}

#[derive(Debug, Default)]
pub struct BatchCollector<'frame> {
    batches: Vec<EntityBatch<'frame>>,
    index: HashMap<Handle<RenderableModel>, usize>,
    terrains: Vec<&'frame TerrainTile>,
}

impl<'frame> BatchCollector<'frame> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entity` to its model's batch. Submitting the same entity twice
    /// draws it twice.
    pub fn submit_entity(&mut self, entity: &'frame Entity) {
        let model = entity.model;
        let slot = *self.index.entry(model.id).or_insert_with(|| {
            self.batches.push(EntityBatch {
                model,
                entities: Vec::new(),
            });
            self.batches.len() - 1
        });
        self.batches[slot].entities.push(entity);
    }

    pub fn submit_entities(&mut self, entities: impl IntoIterator<Item = &'frame Entity>) {
        entities
            .into_iter()
            .for_each(|entity| self.submit_entity(entity));
    }

    pub fn submit_terrain(&mut self, terrain: &'frame TerrainTile) {
        self.terrains.push(terrain);
    }

    /// Takes every entity batch, leaving the collector without any.
    pub fn drain_entities(&mut self) -> Vec<EntityBatch<'frame>> {
        self.index.clear();
        std::mem::take(&mut self.batches)
    }

    /// Takes every terrain tile, leaving the collector without any.
    pub fn drain_terrain(&mut self) -> Vec<&'frame TerrainTile> {
        std::mem::take(&mut self.terrains)
    }

    pub fn batch(&self, model: Handle<RenderableModel>) -> Option<&EntityBatch<'frame>> {
        self.index.get(&model).map(|&slot| &self.batches[slot])
    }

    pub fn batches(&self) -> &[EntityBatch<'frame>] {
        &self.batches
    }

    pub fn group_count(&self) -> usize {
        self.batches.len()
    }

    pub fn entity_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.entities.len()).sum()
    }

    pub fn terrain_count(&self) -> usize {
        self.terrains.len()
    }

    /// Number of draw calls the collected objects will produce.
    pub fn draw_count(&self) -> usize {
        self.entity_count() + self.terrain_count()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty() && self.terrains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::data_structures::model::Material;

    fn model(id: usize) -> RenderableModel {
        RenderableModel::new(
            Handle::new(id),
            Handle::new(id),
            Handle::new(id),
            36,
            Material::default(),
        )
    }

    fn entity(model_id: usize, x: f32) -> Entity {
        Entity::new(model(model_id), Vector3::new(x, 0.0, 0.0), 0.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn groups_follow_first_submission_order() {
        let (a1, b1, a2) = (entity(7, 0.0), entity(2, 1.0), entity(7, 2.0));
        let mut batch = BatchCollector::new();
        batch.submit_entities([&a1, &b1, &a2]);

        let ids: Vec<_> = batch.batches().iter().map(|b| b.model.id.index()).collect();
        assert_eq!(ids, vec![7, 2]);
        assert_eq!(batch.batch(Handle::new(7)).unwrap().entities.len(), 2);
        assert_eq!(batch.entity_count(), 3);
    }

    #[test]
    fn draining_empties_the_collector() {
        let e = entity(0, 0.0);
        let tile = TerrainTile::new(0, -1, Handle::new(0), 6, Handle::new(0));
        let mut batch = BatchCollector::new();
        batch.submit_entity(&e);
        batch.submit_terrain(&tile);
        assert_eq!(batch.draw_count(), 2);

        assert_eq!(batch.drain_entities().len(), 1);
        assert_eq!(batch.drain_terrain().len(), 1);
        assert!(batch.is_empty());
        assert!(batch.batch(Handle::new(0)).is_none());

        // A drained collector starts new groups from scratch.
        batch.submit_entity(&e);
        assert_eq!(batch.group_count(), 1);
        assert_eq!(batch.entity_count(), 1);
    }
}
