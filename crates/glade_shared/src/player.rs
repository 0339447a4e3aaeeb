use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};

use crate::input::{InputState, MoveFlags};
use crate::physics::Aabb;

pub const GRID_SIZE: f32 = 1.0;
pub const GRID_HEIGHT: f32 = 0.5;
pub const PLAYER_HEIGHT: f32 = 2.0;
pub const PLAYER_WIDTH: f32 = 1.0;
pub const GRAVITY: f32 = 9.8 / 60.0;
pub const FALL_GRAVITY: f32 = GRAVITY / 2.0;
pub const MOVE_SPEED: f32 = 0.1;
pub const JUMP_OFFSET: f32 = 1.0;
pub const JUMP_COOLDOWN: Duration = Duration::from_millis(600);
/// Lowest height the player center may reach.
pub const REST_HEIGHT: f32 = PLAYER_HEIGHT / 2.0 + GRID_HEIGHT / 2.0;

pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, PLAYER_HEIGHT / 2.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vec3,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(SPAWN_POSITION)
    }
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    pub fn size() -> Vec3 {
        Vec3::new(PLAYER_WIDTH, PLAYER_HEIGHT, PLAYER_WIDTH)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, Self::size())
    }

    pub fn is_airborne(&self) -> bool {
        self.position.y > REST_HEIGHT
    }

    pub fn apply_gravity(&mut self) {
        if self.is_airborne() {
            self.position.y -= FALL_GRAVITY;
        }
    }

    /// Moves along the camera's horizontal basis according to held keys.
    pub fn apply_movement(&mut self, moves: MoveFlags, look: Vec3) {
        self.position += movement_vector(moves, look);
    }

    /// Instant upward offset. Returns `false` while the cooldown runs.
    pub fn jump(&mut self, input: &mut InputState, now: Instant) -> bool {
        if !input.try_jump(now) {
            return false;
        }
        self.position.y += JUMP_OFFSET;
        true
    }

    pub fn clamp_to_floor(&mut self) {
        self.position.y = self.position.y.max(REST_HEIGHT);
    }
}

/// Per-tick displacement for the held keys. `look` is flattened onto the
/// ground plane without renormalizing, so looking steeply up or down slows
/// walking.
pub fn movement_vector(moves: MoveFlags, look: Vec3) -> Vec3 {
    let axis = |positive: MoveFlags, negative: MoveFlags| {
        moves.contains(positive) as i8 as f32 - moves.contains(negative) as i8 as f32
    };
    let intent = Vec2::new(
        axis(MoveFlags::FORWARD, MoveFlags::BACKWARD),
        axis(MoveFlags::LEFT, MoveFlags::RIGHT),
    )
    .normalize_or_zero()
        * MOVE_SPEED;

    let forward = Vec3::new(look.x, 0.0, look.z);
    // The lateral intent is `left - right` applied along `forward x up`, so
    // A strafes toward the camera's right and D toward its left.
    let right = forward.cross(Vec3::Y);
    forward * intent.x + right * intent.y
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use glam::Vec3;

    use super::{movement_vector, Player, FALL_GRAVITY, MOVE_SPEED, REST_HEIGHT};
    use crate::input::{InputState, MoveFlags};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn forward_follows_camera_direction() {
        let step = movement_vector(MoveFlags::FORWARD, Vec3::NEG_Z);
        assert!(approx(step, Vec3::new(0.0, 0.0, -MOVE_SPEED)));
    }

    #[test]
    fn lateral_intent_runs_along_forward_cross_up() {
        let step = movement_vector(MoveFlags::LEFT, Vec3::NEG_Z);
        assert!(approx(step, Vec3::NEG_Z.cross(Vec3::Y) * MOVE_SPEED));
        assert!(approx(step, Vec3::new(MOVE_SPEED, 0.0, 0.0)));

        let step = movement_vector(MoveFlags::RIGHT, Vec3::NEG_Z);
        assert!(approx(step, Vec3::new(-MOVE_SPEED, 0.0, 0.0)));

        let step = movement_vector(MoveFlags::RIGHT, Vec3::Z);
        assert!(approx(step, Vec3::new(MOVE_SPEED, 0.0, 0.0)));
    }

    #[test]
    fn diagonal_is_not_faster() {
        let step = movement_vector(MoveFlags::FORWARD | MoveFlags::LEFT, Vec3::NEG_Z);
        assert!((step.length() - MOVE_SPEED).abs() < 1e-5);
    }

    #[test]
    fn opposing_keys_cancel() {
        let step = movement_vector(MoveFlags::FORWARD | MoveFlags::BACKWARD, Vec3::X);
        assert_eq!(step, Vec3::ZERO);
    }

    #[test]
    fn looking_down_keeps_vertical_position() {
        let look = Vec3::new(0.0, -0.8, -0.6);
        let step = movement_vector(MoveFlags::FORWARD, look);
        assert_eq!(step.y, 0.0);
        assert!(approx(step, Vec3::new(0.0, 0.0, -0.6 * MOVE_SPEED)));
    }

    #[test]
    fn gravity_only_applies_above_rest_height() {
        let mut player = Player::new(Vec3::new(0.0, REST_HEIGHT, 0.0));
        player.apply_gravity();
        assert_eq!(player.position.y, REST_HEIGHT);

        player.position.y = 3.0;
        player.apply_gravity();
        assert!((player.position.y - (3.0 - FALL_GRAVITY)).abs() < 1e-6);
    }

    #[test]
    fn floor_clamp_lifts_spawn_position() {
        let mut player = Player::default();
        player.clamp_to_floor();
        assert_eq!(player.position.y, REST_HEIGHT);
    }

    #[test]
    fn jump_is_an_instant_offset_with_cooldown() {
        let start = Instant::now();
        let mut input = InputState::default();
        let mut player = Player::new(Vec3::new(0.0, REST_HEIGHT, 0.0));

        assert!(player.jump(&mut input, start));
        assert_eq!(player.position.y, REST_HEIGHT + 1.0);

        assert!(!player.jump(&mut input, start + Duration::from_millis(100)));
        assert_eq!(player.position.y, REST_HEIGHT + 1.0);

        assert!(player.jump(&mut input, start + Duration::from_millis(600)));
        assert!(!player.jump(&mut input, start + Duration::from_millis(601)));
    }
}
