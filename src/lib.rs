//! glade
//!
//! A small forward renderer for textured OBJ models on blended terrain, lit
//! by one directional light and viewed through a third-person camera that
//! follows the player.
//!
//! Each frame the scene submits its entities and terrain tiles to a
//! [`render::batch::BatchCollector`]. Entities sharing a model end up in one
//! batch, so the [`render::master::MasterRenderer`] binds every model once
//! and issues one draw per entity, then draws the terrain in a second pass.
//!
//! High-level modules
//! - `app`: window, event loop and the frame loop around a [`app::Scene`]
//! - `camera`: third-person camera, its input mapping and the projection
//! - `config`: settings read from `assets/settings.toml`
//! - `context`: the window surface, device and queue
//! - `data_structures`: entities, models, terrain, textures and handles
//! - `demo`: the bundled forest scene
//! - `input`: keyboard and mouse state
//! - `pipelines`: wgpu pipelines, shaders and per-frame GPU buffers
//! - `player`: the keyboard-steered entity
//! - `render`: batching, pass order and the graphics API seam
//! - `resources`: asset loading and the asset store
//!

pub mod app;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod demo;
pub mod input;
pub mod pipelines;
pub mod player;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use winit::keyboard::KeyCode;
