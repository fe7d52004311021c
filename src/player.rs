use winit::keyboard::KeyCode;

use crate::{
    config::PlayerConfig, data_structures::entity::Entity, input::InputState,
};

const FORWARD: &[KeyCode] = &[KeyCode::KeyW, KeyCode::ArrowUp];
const BACKWARD: &[KeyCode] = &[KeyCode::KeyS, KeyCode::ArrowDown];
const LEFT: &[KeyCode] = &[KeyCode::KeyA, KeyCode::ArrowLeft];
const RIGHT: &[KeyCode] = &[KeyCode::KeyD, KeyCode::ArrowRight];

/// The entity the camera follows, steered with the keyboard.
#[derive(Clone, Debug)]
pub struct Player {
    pub entity: Entity,
    run_speed: f32,
    turn_speed: f32,
}

impl Player {
    pub fn new(entity: Entity, config: &PlayerConfig) -> Self {
        Self {
            entity,
            run_speed: config.run_speed,
            turn_speed: config.turn_speed,
        }
    }

    /// Turns, then moves along the new heading. `dt` is in seconds.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        let run = axis(input, FORWARD, BACKWARD) * self.run_speed;
        let turn = axis(input, LEFT, RIGHT) * self.turn_speed;

        self.entity.increase_rotation(0.0, turn * dt, 0.0);
        let distance = run * dt;
        let heading = self.entity.rot_y.to_radians();
        self.entity
            .increase_position(distance * heading.sin(), 0.0, distance * heading.cos());
    }
}

fn axis(input: &InputState, positive: &[KeyCode], negative: &[KeyCode]) -> f32 {
    match (input.any_key_down(positive), input.any_key_down(negative)) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cgmath::Vector3;

    use super::*;
    use crate::data_structures::{
        handle::Handle,
        model::{Material, RenderableModel},
    };

    fn player() -> Player {
        let model = RenderableModel::new(
            Handle::new(0),
            Handle::new(0),
            Handle::new(0),
            3,
            Material::default(),
        );
        let entity = Entity::new(model, Vector3::new(0.0, 0.0, -50.0), 0.0, 0.0, 0.0, 1.0);
        Player::new(entity, &PlayerConfig::default())
    }

    #[test]
    fn idle_player_stays_put() {
        let mut p = player();
        p.update(&InputState::new(), 1.0);
        assert_eq!(p.entity.position, Vector3::new(0.0, 0.0, -50.0));
        assert_eq!(p.entity.rot_y, 0.0);
    }

    #[test]
    fn running_follows_the_heading() {
        let mut p = player();
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        p.update(&input, 0.5);
        assert_relative_eq!(p.entity.position.z, -40.0, epsilon = 1e-4);

        p.entity.rot_y = 90.0;
        p.update(&input, 0.5);
        assert_relative_eq!(p.entity.position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(p.entity.position.z, -40.0, epsilon = 1e-4);
    }

    #[test]
    fn opposing_keys_cancel_out() {
        let mut p = player();
        let mut input = InputState::new();
        input.press(KeyCode::KeyA);
        input.press(KeyCode::KeyD);
        input.press(KeyCode::ArrowUp);
        input.press(KeyCode::ArrowDown);
        p.update(&input, 1.0);
        assert_eq!(p.entity.rot_y, 0.0);
        assert_eq!(p.entity.position, Vector3::new(0.0, 0.0, -50.0));
    }

    #[test]
    fn turning_is_scaled_by_dt() {
        let mut p = player();
        let mut input = InputState::new();
        input.press(KeyCode::KeyD);
        p.update(&input, 0.25);
        assert_relative_eq!(p.entity.rot_y, -40.0);
    }
}
