//! Scene data: models, entities, terrain, light and textures.
//!
//! - `handle` typed indices into the asset store
//! - `model` contains mesh and material definitions and the [`model::RenderableModel`] handle bundle
//! - `entity` positioned model instances and their GPU instance layout
//! - `terrain` terrain tiles and CPU-side terrain mesh generation
//! - `light` the single directional light
//! - `texture` GPU texture wrapper and creation utilities

pub mod entity;
pub mod handle;
pub mod light;
pub mod model;
pub mod terrain;
pub mod texture;
