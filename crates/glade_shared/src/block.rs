use glam::Vec3;

use crate::physics::Aabb;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u32);

/// 24-bit `0xRRGGBB` color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    pub const fn hex(self) -> u32 {
        self.0
    }

    pub fn to_rgb(self) -> [f32; 3] {
        [
            ((self.0 >> 16) & 0xff) as f32 / 255.0,
            ((self.0 >> 8) & 0xff) as f32 / 255.0,
            (self.0 & 0xff) as f32 / 255.0,
        ]
    }

    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_rgb();
        [r, g, b, alpha]
    }
}

pub const PALETTE: [Color; 10] = [
    Color::from_hex(0xff0000),
    Color::from_hex(0x00ff00),
    Color::from_hex(0x0000ff),
    Color::from_hex(0xffff00),
    Color::from_hex(0xff00ff),
    Color::from_hex(0x00ffff),
    Color::from_hex(0xffa500),
    Color::from_hex(0x808080),
    Color::from_hex(0x800000),
    Color::from_hex(0x008000),
];

pub const PALETTE_SIZE: usize = PALETTE.len();

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Ground,
    Platform,
    Trunk,
    TrunkTop,
    Leaves,
    Hill,
    Placed,
}

impl BlockKind {
    /// Ground and platform are fixed terrain; everything else can be broken.
    pub fn is_breakable(self) -> bool {
        !matches!(self, BlockKind::Ground | BlockKind::Platform)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    /// Center of the box.
    pub position: Vec3,
    pub size: Vec3,
    pub color: Color,
    pub opacity: f32,
    pub collision: bool,
}

impl Block {
    pub fn new(kind: BlockKind, position: Vec3, size: Vec3, color: Color) -> Self {
        Self {
            kind,
            position,
            size,
            color,
            opacity: 1.0,
            collision: true,
        }
    }

    pub fn cube(kind: BlockKind, position: Vec3, color: Color) -> Self {
        Self::new(kind, position, Vec3::ONE, color)
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn decorative(mut self) -> Self {
        self.collision = false;
        self
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{Block, BlockKind, Color, PALETTE};

    #[test]
    fn color_channels_unpack_from_hex() {
        let rgb = Color::from_hex(0x87CEEB).to_rgb();
        assert_eq!(rgb, [135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0]);
        assert_eq!(Color::from_hex(0xff12_3456).hex(), 0x12_3456);
    }

    #[test]
    fn palette_matches_hotbar_order() {
        assert_eq!(PALETTE.len(), 10);
        assert_eq!(PALETTE[0].hex(), 0xff0000);
        assert_eq!(PALETTE[6].hex(), 0xffa500);
        assert_eq!(PALETTE[9].hex(), 0x008000);
    }

    #[test]
    fn bounds_are_centered_on_position() {
        let trunk = Block::new(
            BlockKind::Trunk,
            Vec3::new(3.0, 0.25, -2.0),
            Vec3::new(1.0, 2.0, 1.0),
            Color::from_hex(0x8B4513),
        );
        let bounds = trunk.bounds();
        assert_eq!(bounds.min, Vec3::new(2.5, -0.75, -2.5));
        assert_eq!(bounds.max, Vec3::new(3.5, 1.25, -1.5));
        assert_eq!(trunk.height(), 2.0);
    }

    #[test]
    fn leaves_are_decorative_and_translucent() {
        let leaves = Block::cube(BlockKind::Leaves, Vec3::ZERO, PALETTE[1])
            .with_opacity(0.7)
            .decorative();
        assert!(!leaves.collision);
        assert!(leaves.is_translucent());
        assert!(!BlockKind::Ground.is_breakable());
        assert!(!BlockKind::Platform.is_breakable());
        assert!(BlockKind::Leaves.is_breakable());
        assert!(BlockKind::Placed.is_breakable());
    }
}
