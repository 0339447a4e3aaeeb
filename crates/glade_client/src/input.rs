use glade_shared::input::MoveKey;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    GrabPointer,
    Break,
    Place,
}

/// What a mouse button event does. While the pointer is free, any press only
/// requests the lock.
pub fn click_action(
    button: MouseButton,
    state: ElementState,
    pointer_locked: bool,
) -> Option<ClickAction> {
    if !state.is_pressed() {
        return None;
    }
    if !pointer_locked {
        return Some(ClickAction::GrabPointer);
    }
    match button {
        MouseButton::Left => Some(ClickAction::Break),
        MouseButton::Right => Some(ClickAction::Place),
        _ => None,
    }
}

pub fn move_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Backward),
        KeyCode::KeyA => Some(MoveKey::Left),
        KeyCode::KeyD => Some(MoveKey::Right),
        _ => None,
    }
}

/// Digit row to zero-based hotbar slot; `0` is the tenth slot.
pub fn hotbar_slot(code: KeyCode) -> Option<usize> {
    Some(match code {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        KeyCode::Digit9 => 8,
        KeyCode::Digit0 => 9,
        _ => return None,
    })
}

/// Wheel movement as hotbar steps. Scrolling down moves to the next slot.
pub fn scroll_steps(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y.round() as i32,
        MouseScrollDelta::PixelDelta(pos) => {
            if pos.y > 10.0 {
                -1
            } else if pos.y < -10.0 {
                1
            } else {
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glade_shared::input::MoveKey;
    use winit::dpi::PhysicalPosition;
    use winit::event::{ElementState, MouseButton, MouseScrollDelta};
    use winit::keyboard::KeyCode;

    use super::{click_action, hotbar_slot, move_key, scroll_steps, ClickAction};

    #[test]
    fn unlocked_click_only_grabs_pointer() {
        for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
            assert_eq!(
                click_action(button, ElementState::Pressed, false),
                Some(ClickAction::GrabPointer)
            );
        }
        assert_eq!(click_action(MouseButton::Left, ElementState::Released, false), None);
    }

    #[test]
    fn locked_clicks_break_and_place() {
        assert_eq!(
            click_action(MouseButton::Left, ElementState::Pressed, true),
            Some(ClickAction::Break)
        );
        assert_eq!(
            click_action(MouseButton::Right, ElementState::Pressed, true),
            Some(ClickAction::Place)
        );
        assert_eq!(click_action(MouseButton::Middle, ElementState::Pressed, true), None);
        assert_eq!(click_action(MouseButton::Right, ElementState::Released, true), None);
    }

    #[test]
    fn wasd_maps_to_move_keys() {
        assert_eq!(move_key(KeyCode::KeyW), Some(MoveKey::Forward));
        assert_eq!(move_key(KeyCode::KeyD), Some(MoveKey::Right));
        assert_eq!(move_key(KeyCode::Space), None);
    }

    #[test]
    fn zero_selects_last_slot() {
        assert_eq!(hotbar_slot(KeyCode::Digit1), Some(0));
        assert_eq!(hotbar_slot(KeyCode::Digit0), Some(9));
        assert_eq!(hotbar_slot(KeyCode::KeyQ), None);
    }

    #[test]
    fn wheel_down_steps_forward() {
        assert_eq!(scroll_steps(MouseScrollDelta::LineDelta(0.0, -1.0)), 1);
        assert_eq!(scroll_steps(MouseScrollDelta::LineDelta(0.0, 2.0)), -2);
        assert_eq!(
            scroll_steps(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 3.0))),
            0
        );
    }
}
