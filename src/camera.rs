//! Third-person camera, its input mapping and the projection.
//!
//! The camera orbits a followed entity. User input only changes the orbit
//! state (distance, angle around the target, pitch, extra height); the pose
//! itself is recomputed from scratch every [`Camera::update`] so it is a pure
//! function of the target's transform and the orbit state.

use cgmath::{Deg, Matrix4, Rad, Vector3, perspective};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{config::CameraConfig, data_structures::entity::Entity, input::InputState};

/// cgmath builds OpenGL-style clip space (z in -1..1), wgpu expects 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Per-frame camera input, already scaled by the controller's sensitivities.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
    /// Positive moves the camera closer to the target.
    pub zoom: f32,
    /// Degrees; positive tilts the view upwards.
    pub pitch: f32,
    /// Degrees around the target.
    pub orbit: f32,
    /// Extra height added this frame.
    pub raise: f32,
}

/// Maps raw input to [`CameraInput`].
///
/// Right mouse button + vertical motion pitches, left mouse button +
/// horizontal motion orbits, the wheel zooms and `Z` raises the camera.
#[derive(Clone, Debug)]
pub struct CameraController {
    zoom_sensitivity: f32,
    pitch_sensitivity: f32,
    orbit_sensitivity: f32,
    raise_step: f32,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            zoom_sensitivity: config.zoom_sensitivity,
            pitch_sensitivity: config.pitch_sensitivity,
            orbit_sensitivity: config.orbit_sensitivity,
            raise_step: config.raise_step,
        }
    }

    pub fn input(&self, state: &InputState) -> CameraInput {
        let (dx, dy) = state.mouse_delta();
        let pitch = if state.is_button_down(MouseButton::Right) {
            dy * self.pitch_sensitivity
        } else {
            0.0
        };
        let orbit = if state.is_button_down(MouseButton::Left) {
            dx * self.orbit_sensitivity
        } else {
            0.0
        };
        let raise = if state.is_key_down(KeyCode::KeyZ) {
            self.raise_step
        } else {
            0.0
        };
        CameraInput {
            zoom: state.wheel_delta() * self.zoom_sensitivity,
            pitch,
            orbit,
            raise,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: Vector3<f32>,
    pitch: f32,
    yaw: f32,
    roll: f32,
    distance_from_target: f32,
    angle_around_target: f32,
    height_offset: f32,
    min_distance: f32,
    max_distance: f32,
    min_pitch: f32,
    max_pitch: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vector3::new(0.0, 5.0, 0.0),
            pitch: config.start_pitch,
            yaw: 0.0,
            roll: 0.0,
            distance_from_target: config.start_distance,
            angle_around_target: 0.0,
            height_offset: 0.0,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_pitch: config.min_pitch,
            max_pitch: config.max_pitch,
        }
    }

    /// Applies `input` to the orbit state, then places the camera behind
    /// `target` looking at it.
    pub fn update(&mut self, target: &Entity, input: &CameraInput) {
        self.distance_from_target = (self.distance_from_target - input.zoom)
            .clamp(self.min_distance, self.max_distance);
        self.pitch = (self.pitch - input.pitch).clamp(self.min_pitch, self.max_pitch);
        self.angle_around_target -= input.orbit;
        self.height_offset += input.raise;

        let pitch = Rad::from(Deg(self.pitch)).0;
        let horizontal = self.distance_from_target * pitch.cos();
        let vertical = self.distance_from_target * pitch.sin();

        let theta = target.rot_y + self.angle_around_target;
        let theta_rad = Rad::from(Deg(theta)).0;
        let offset_x = horizontal * theta_rad.sin();
        let offset_z = horizontal * theta_rad.cos();

        self.position = Vector3::new(
            target.position.x - offset_x,
            target.position.y + vertical + self.height_offset,
            target.position.z - offset_z,
        );
        self.yaw = 180.0 - theta;
    }

    /// Camera-space transform: pitch, yaw and roll about the camera's own
    /// axes, applied after moving the world by `-position`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Deg(self.pitch))
            * Matrix4::from_angle_y(Deg(self.yaw))
            * Matrix4::from_angle_z(Deg(self.roll))
            * Matrix4::from_translation(-self.position)
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn distance_from_target(&self) -> f32 {
        self.distance_from_target
    }

    pub fn angle_around_target(&self) -> f32 {
        self.angle_around_target
    }

    pub fn height_offset(&self) -> f32 {
        self.height_offset
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector4, Zero};

    use super::*;
    use crate::data_structures::{
        handle::Handle,
        model::{Material, RenderableModel},
    };

    fn target(position: Vector3<f32>, rot_y: f32) -> Entity {
        let model = RenderableModel::new(
            Handle::new(0),
            Handle::new(0),
            Handle::new(0),
            0,
            Material::default(),
        );
        Entity::new(model, position, 0.0, rot_y, 0.0, 1.0)
    }

    fn level_camera() -> Camera {
        Camera::new(&CameraConfig {
            start_pitch: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn level_camera_sits_behind_the_target() {
        let mut camera = level_camera();
        camera.update(&target(Vector3::zero(), 0.0), &CameraInput::default());
        let p = camera.position();
        assert!(p.x.abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
        assert!((p.z + 50.0).abs() < 1e-4);
        assert_eq!(camera.yaw(), 180.0);
    }

    #[test]
    fn target_is_centred_in_view() {
        let mut camera = Camera::new(&CameraConfig::default());
        let t = target(Vector3::new(10.0, 0.0, -50.0), 30.0);
        camera.update(&t, &CameraInput::default());
        let eye = camera.view_matrix() * t.position.extend(1.0);
        assert!(eye.x.abs() < 1e-3, "x = {}", eye.x);
        assert!(eye.y.abs() < 1e-3, "y = {}", eye.y);
        assert!((eye.z + 50.0).abs() < 1e-3, "z = {}", eye.z);
    }

    #[test]
    fn zoom_and_pitch_are_clamped() {
        let config = CameraConfig::default();
        let mut camera = Camera::new(&config);
        let t = target(Vector3::zero(), 0.0);
        camera.update(
            &t,
            &CameraInput {
                zoom: 1000.0,
                pitch: -1000.0,
                ..Default::default()
            },
        );
        assert_eq!(camera.distance_from_target(), config.min_distance);
        assert_eq!(camera.pitch(), config.max_pitch);
    }

    #[test]
    fn raise_accumulates() {
        let mut camera = level_camera();
        let t = target(Vector3::zero(), 0.0);
        let raise = CameraInput {
            raise: 10.0,
            ..Default::default()
        };
        camera.update(&t, &raise);
        camera.update(&t, &raise);
        assert!((camera.position().y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn controller_ignores_motion_without_buttons() {
        let controller = CameraController::new(&CameraConfig::default());
        let mut state = InputState::new();
        state.add_mouse_motion(10.0, 10.0);
        state.add_wheel(120.0);
        let input = controller.input(&state);
        assert_eq!(input.pitch, 0.0);
        assert_eq!(input.orbit, 0.0);
        assert!((input.zoom - 12.0).abs() < 1e-5);

        state.press_button(MouseButton::Right);
        state.press(KeyCode::KeyZ);
        let input = controller.input(&state);
        assert!((input.pitch - 1.0).abs() < 1e-5);
        assert_eq!(input.raise, 10.0);
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let projection = Projection::new(800, 600, Deg(70.0), 0.1, 1000.0);
        let clip = projection.calc_matrix() * Vector4::new(0.0, 0.0, -0.1, 1.0);
        assert!((clip.z / clip.w).abs() < 1e-4);
    }
}
