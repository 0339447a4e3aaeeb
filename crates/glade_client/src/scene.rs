//! CPU-side mirror of what the GPU draws.
//!
//! `World` pushes every change in here through the `Scene` trait. The
//! renderer pulls the dirty parts once per frame, so block and burst updates
//! between two frames cost a single upload.

use glade_shared::block::{Block, BlockId};
use glade_shared::day_night::{LightingPreset, DAY_LIGHTING};
use glade_shared::particles::{BurstId, ParticleBurst, BURST_POINT_SIZE};
use glade_shared::world::Scene;
use glam::Vec3;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockDraw {
    pub center: Vec3,
    pub size: Vec3,
    pub color: [f32; 4],
}

impl BlockDraw {
    fn from_block(block: &Block) -> Self {
        Self {
            center: block.position,
            size: block.size,
            color: block.color.to_rgba(block.opacity),
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.color[3] < 1.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurstDraw {
    pub points: Vec<Vec3>,
    pub color: [f32; 4],
    pub size: f32,
}

impl BurstDraw {
    fn from_burst(burst: &ParticleBurst) -> Self {
        Self {
            points: burst.points.iter().map(|offset| burst.origin + *offset).collect(),
            color: burst.color.to_rgba(burst.opacity()),
            size: BURST_POINT_SIZE,
        }
    }
}

#[derive(Debug)]
pub struct RenderScene {
    blocks: FxHashMap<BlockId, BlockDraw>,
    bursts: FxHashMap<BurstId, BurstDraw>,
    lighting: LightingPreset,
    blocks_dirty: bool,
    bursts_dirty: bool,
}

impl Default for RenderScene {
    fn default() -> Self {
        Self {
            blocks: FxHashMap::default(),
            bursts: FxHashMap::default(),
            lighting: DAY_LIGHTING,
            blocks_dirty: true,
            bursts_dirty: true,
        }
    }
}

impl RenderScene {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn burst_count(&self) -> usize {
        self.bursts.len()
    }

    pub fn lighting(&self) -> &LightingPreset {
        &self.lighting
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BlockDraw> {
        self.blocks.values()
    }

    pub fn bursts(&self) -> impl Iterator<Item = &BurstDraw> {
        self.bursts.values()
    }

    /// Returns whether block instances changed since the last call.
    pub fn take_blocks_dirty(&mut self) -> bool {
        std::mem::take(&mut self.blocks_dirty)
    }

    pub fn take_bursts_dirty(&mut self) -> bool {
        std::mem::take(&mut self.bursts_dirty)
    }
}

impl Scene for RenderScene {
    fn attach_block(&mut self, id: BlockId, block: &Block) {
        self.blocks.insert(id, BlockDraw::from_block(block));
        self.blocks_dirty = true;
    }

    fn detach_block(&mut self, id: BlockId) {
        if self.blocks.remove(&id).is_some() {
            self.blocks_dirty = true;
        }
    }

    fn attach_burst(&mut self, id: BurstId, burst: &ParticleBurst) {
        self.bursts.insert(id, BurstDraw::from_burst(burst));
        self.bursts_dirty = true;
    }

    fn update_burst(&mut self, id: BurstId, burst: &ParticleBurst) {
        self.bursts.insert(id, BurstDraw::from_burst(burst));
        self.bursts_dirty = true;
    }

    fn detach_burst(&mut self, id: BurstId) {
        if self.bursts.remove(&id).is_some() {
            self.bursts_dirty = true;
        }
    }

    fn apply_lighting(&mut self, lighting: &LightingPreset) {
        self.lighting = *lighting;
    }
}

#[cfg(test)]
mod tests {
    use glade_shared::block::{Block, BlockKind, Color};
    use glade_shared::day_night::NIGHT_LIGHTING;
    use glade_shared::world::World;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::RenderScene;

    #[test]
    fn world_changes_mark_scene_dirty() {
        let mut world = World::new(RenderScene::default());
        assert!(world.scene_mut().take_blocks_dirty());
        assert!(!world.scene_mut().take_blocks_dirty());

        let id = world
            .add(Block::cube(BlockKind::Placed, Vec3::ZERO, Color(0xff0000)))
            .unwrap();
        assert_eq!(world.scene().block_count(), 1);
        assert!(world.scene_mut().take_blocks_dirty());

        world.remove(id);
        assert_eq!(world.scene().block_count(), 0);
        assert!(world.scene_mut().take_blocks_dirty());
    }

    #[test]
    fn leaves_are_drawn_translucent() {
        let mut world = World::new(RenderScene::default());
        world
            .add(Block::cube(BlockKind::Leaves, Vec3::ZERO, Color(0x00ff00)).with_opacity(0.7))
            .unwrap();
        let draw = world.scene().blocks().next().copied().unwrap();
        assert!(draw.is_translucent());
        assert_eq!(draw.color, [0.0, 1.0, 0.0, 0.7]);
    }

    #[test]
    fn burst_points_follow_origin_and_opacity() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut world = World::new(RenderScene::default());
        let id = world
            .add(Block::cube(BlockKind::Placed, Vec3::new(0.0, 5.0, 0.0), Color(0xffffff)))
            .unwrap();
        world.shatter(id, &mut rng);
        world.advance_bursts();

        let burst = world.scene().bursts().next().cloned().unwrap();
        assert_eq!(burst.points.len(), 100);
        assert!((burst.color[3] - 0.98).abs() < 1e-6);
        assert!(burst.points.iter().all(|p| p.y > 5.0 - 1.1 && p.y < 5.0 + 1.0));
    }

    #[test]
    fn lighting_is_recorded() {
        let mut world = World::new(RenderScene::default());
        world.apply_lighting(&NIGHT_LIGHTING);
        assert_eq!(*world.scene().lighting(), NIGHT_LIGHTING);
    }
}
