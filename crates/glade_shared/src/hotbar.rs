use crate::block::{Color, PALETTE, PALETTE_SIZE};

/// Selected palette slot, zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hotbar {
    selected: usize,
}

impl Hotbar {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn color(&self) -> Color {
        PALETTE[self.selected]
    }

    /// Out-of-range slots are ignored.
    pub fn select(&mut self, slot: usize) -> bool {
        if slot >= PALETTE_SIZE {
            return false;
        }
        self.selected = slot;
        true
    }

    /// Steps the selection, wrapping at both ends.
    pub fn cycle(&mut self, delta: i32) {
        let len = PALETTE_SIZE as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
    }

    /// Slot highlight flags in hotbar order.
    pub fn highlights(&self) -> [bool; PALETTE_SIZE] {
        std::array::from_fn(|slot| slot == self.selected)
    }
}
