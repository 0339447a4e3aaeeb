use glam::Vec3;

use crate::block::PALETTE_SIZE;
use crate::hotbar::Hotbar;
use crate::interaction::round_half_up;

/// Everything the overlay shows, derived from game state without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub position: String,
    pub inventory: String,
    pub feedback: String,
    pub hotbar: [bool; PALETTE_SIZE],
}

impl HudView {
    pub fn derive(position: Vec3, block_count: usize, hotbar: &Hotbar) -> Self {
        Self {
            position: format!(
                "Position: ({}, {}, {})",
                display_int(position.x),
                display_int(position.y),
                display_int(position.z),
            ),
            inventory: format!("Inventory: {block_count} blocks"),
            feedback: format!("Selected Block Color: {}", hotbar.selected() + 1),
            hotbar: hotbar.highlights(),
        }
    }

    pub fn lines(&self) -> [&str; 3] {
        [&self.position, &self.inventory, &self.feedback]
    }
}

fn display_int(value: f32) -> i64 {
    round_half_up(value) as i64
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::HudView;
    use crate::hotbar::Hotbar;

    #[test]
    fn lines_use_rounded_position_and_one_based_slot() {
        let mut hotbar = Hotbar::default();
        hotbar.select(2);
        let view = HudView::derive(Vec3::new(1.5, 1.25, -0.4), 332, &hotbar);

        assert_eq!(view.position, "Position: (2, 1, 0)");
        assert_eq!(view.inventory, "Inventory: 332 blocks");
        assert_eq!(view.feedback, "Selected Block Color: 3");
        assert!(view.hotbar[2]);
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        let view = HudView::derive(Vec3::new(-0.0, -0.3, -0.5), 0, &Hotbar::default());
        assert_eq!(view.position, "Position: (0, 0, 0)");
    }

    #[test]
    fn derivation_is_idempotent() {
        let hotbar = Hotbar::default();
        let position = Vec3::new(-3.7, 5.25, 10.5);
        let first = HudView::derive(position, 12, &hotbar);
        let second = HudView::derive(position, 12, &hotbar);
        assert_eq!(first, second);
    }
}
