//! Tunable constants, optionally overridden by `assets/settings.toml`.
//!
//! Every field has a default, so a settings file only needs to list what it
//! changes:
//!
//! ```toml
//! [render]
//! sky_colour = [0.4, 0.5, 0.6]
//! fog_density = 0.003
//!
//! [camera]
//! max_distance = 120.0
//! ```

use std::path::Path;

use anyhow::{Context as _, ensure};
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
}

impl Settings {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(text).context("invalid settings file")?;
        settings.camera.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Falls back to the defaults when the file is missing. A file that exists
    /// but doesn't parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

/// Projection, sky and fog.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Clear colour, also the colour fog fades into.
    pub sky_colour: [f32; 3],
    pub fog_density: f32,
    pub fog_gradient: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov: 70.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            sky_colour: [0.5, 0.5, 0.5],
            fog_density: 0.0007,
            fog_gradient: 0.5,
        }
    }
}

/// Third-person camera sensitivities and limits.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub start_distance: f32,
    pub start_pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Degrees, measured downwards from the horizon.
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Distance change per wheel unit.
    pub zoom_sensitivity: f32,
    /// Degrees per pixel of vertical mouse motion.
    pub pitch_sensitivity: f32,
    /// Degrees per pixel of horizontal mouse motion.
    pub orbit_sensitivity: f32,
    /// Height added per frame while the raise key is held.
    pub raise_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_distance: 50.0,
            start_pitch: 20.0,
            min_distance: 5.0,
            max_distance: 200.0,
            min_pitch: -10.0,
            max_pitch: 89.0,
            zoom_sensitivity: 0.1,
            pitch_sensitivity: 0.1,
            orbit_sensitivity: 0.3,
            raise_step: 10.0,
        }
    }
}

impl CameraConfig {
    /// Rejects limits the camera can't clamp against.
    pub fn validate(&self) -> anyhow::Result<()> {
        check_range("distance", self.min_distance, self.max_distance)?;
        check_range("pitch", self.min_pitch, self.max_pitch)?;
        ensure!(
            self.start_distance.is_finite() && self.start_pitch.is_finite(),
            "camera start distance and pitch must be finite"
        );
        Ok(())
    }
}

fn check_range(name: &str, min: f32, max: f32) -> anyhow::Result<()> {
    ensure!(
        min.is_finite() && max.is_finite(),
        "camera {name} limits must be finite, got {min}..{max}"
    );
    ensure!(
        min <= max,
        "camera min_{name} ({min}) is greater than max_{name} ({max})"
    );
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Units per second.
    pub run_speed: f32,
    /// Degrees per second.
    pub turn_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            run_speed: 20.0,
            turn_speed: 160.0,
        }
    }
}
