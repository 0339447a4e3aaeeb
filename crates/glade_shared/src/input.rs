use std::time::Instant;

use bitflags::bitflags;
use glade_core::schedule::Cooldown;
use glam::Vec2;

use crate::player::JUMP_COOLDOWN;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MoveFlags: u8 {
        const FORWARD = 0b0001;
        const BACKWARD = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveKey {
    pub fn flag(self) -> MoveFlags {
        match self {
            MoveKey::Forward => MoveFlags::FORWARD,
            MoveKey::Backward => MoveFlags::BACKWARD,
            MoveKey::Left => MoveFlags::LEFT,
            MoveKey::Right => MoveFlags::RIGHT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputState {
    moves: MoveFlags,
    mouse_delta: Vec2,
    jump: Cooldown,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            moves: MoveFlags::empty(),
            mouse_delta: Vec2::ZERO,
            jump: Cooldown::new(JUMP_COOLDOWN),
        }
    }
}

impl InputState {
    pub fn press(&mut self, key: MoveKey) {
        self.moves.insert(key.flag());
    }

    pub fn release(&mut self, key: MoveKey) {
        self.moves.remove(key.flag());
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.moves.contains(key.flag())
    }

    pub fn moves(&self) -> MoveFlags {
        self.moves
    }

    pub fn release_all(&mut self) {
        self.moves = MoveFlags::empty();
        self.mouse_delta = Vec2::ZERO;
    }

    pub fn add_mouse_delta(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.mouse_delta)
    }

    pub fn can_jump(&self, now: Instant) -> bool {
        self.jump.is_ready(now)
    }

    /// Consumes jump availability. A jump during the cooldown is dropped, not
    /// queued.
    pub fn try_jump(&mut self, now: Instant) -> bool {
        self.jump.try_trigger(now)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use glam::Vec2;

    use super::{InputState, MoveFlags, MoveKey};

    #[test]
    fn press_and_release_track_flags() {
        let mut input = InputState::default();
        input.press(MoveKey::Forward);
        input.press(MoveKey::Left);
        assert_eq!(input.moves(), MoveFlags::FORWARD | MoveFlags::LEFT);

        input.release(MoveKey::Forward);
        assert!(!input.is_held(MoveKey::Forward));
        assert!(input.is_held(MoveKey::Left));

        input.release_all();
        assert!(input.moves().is_empty());
    }

    #[test]
    fn mouse_delta_accumulates_until_taken() {
        let mut input = InputState::default();
        input.add_mouse_delta(Vec2::new(3.0, -1.0));
        input.add_mouse_delta(Vec2::new(2.0, 4.0));
        assert_eq!(input.take_mouse_delta(), Vec2::new(5.0, 3.0));
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn jump_waits_for_cooldown() {
        let start = Instant::now();
        let mut input = InputState::default();
        assert!(input.try_jump(start));
        assert!(!input.can_jump(start + Duration::from_millis(300)));
        assert!(!input.try_jump(start + Duration::from_millis(599)));
        assert!(input.try_jump(start + Duration::from_millis(600)));
    }
}
