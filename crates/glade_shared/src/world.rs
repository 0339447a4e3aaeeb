//! The block repository.
//!
//! `World` is the only place that mutates the block set. It owns the render
//! scene handle, so every add or remove reaches the scene in the same call and
//! no frame can observe a block that exists in one but not the other.

use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::block::{Block, BlockId};
use crate::day_night::LightingPreset;
use crate::particles::{BurstId, ParticleBurst, ParticleBursts, DEFAULT_MAX_BURSTS};

pub const DEFAULT_MAX_BLOCKS: usize = 65_536;

/// Render-side mirror of the world. Implemented by the client renderer and by
/// test doubles.
pub trait Scene {
    fn attach_block(&mut self, id: BlockId, block: &Block);
    fn detach_block(&mut self, id: BlockId);
    fn attach_burst(&mut self, id: BurstId, burst: &ParticleBurst);
    fn update_burst(&mut self, id: BurstId, burst: &ParticleBurst);
    fn detach_burst(&mut self, id: BurstId);
    fn apply_lighting(&mut self, lighting: &LightingPreset);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    BlockLimitReached { limit: usize },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockLimitReached { limit } => {
                write!(f, "block limit of {limit} reached")
            }
        }
    }
}

impl std::error::Error for WorldError {}

pub struct World<S: Scene> {
    scene: S,
    blocks: Vec<(BlockId, Block)>,
    bursts: ParticleBursts,
    next_block_id: u32,
    max_blocks: usize,
}

impl<S: Scene> World<S> {
    pub fn new(scene: S) -> Self {
        Self::with_limits(scene, DEFAULT_MAX_BLOCKS, DEFAULT_MAX_BURSTS)
    }

    pub fn with_limits(scene: S, max_blocks: usize, max_bursts: usize) -> Self {
        Self {
            scene,
            blocks: Vec::new(),
            bursts: ParticleBursts::new(max_bursts),
            next_block_id: 0,
            max_blocks: max_blocks.max(1),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_limit(&self) -> usize {
        self.max_blocks
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|(block_id, _)| *block_id == id)
            .map(|(_, block)| block)
    }

    /// Blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().map(|(id, block)| (*id, block))
    }

    pub fn add(&mut self, block: Block) -> Result<BlockId, WorldError> {
        if self.blocks.len() >= self.max_blocks {
            return Err(WorldError::BlockLimitReached {
                limit: self.max_blocks,
            });
        }

        let id = BlockId(self.next_block_id);
        self.next_block_id = self.next_block_id.wrapping_add(1);
        self.scene.attach_block(id, &block);
        self.blocks.push((id, block));
        Ok(id)
    }

    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|(block_id, _)| *block_id == id)?;
        let (_, block) = self.blocks.remove(index);
        self.scene.detach_block(id);
        debug!(?id, kind = ?block.kind, "block removed");
        Some(block)
    }

    /// Removes `id` and leaves a particle burst where it stood, as one step.
    /// The burst is shown already one tick into its fade.
    pub fn shatter<R: Rng + ?Sized>(
        &mut self,
        id: BlockId,
        rng: &mut R,
    ) -> Option<(Block, BurstId)> {
        let block = self.remove(id)?;
        let mut burst = ParticleBurst::new(block.position, block.color, rng);
        burst.advance();
        let burst_id = self.bursts.spawn(&mut self.scene, burst);
        Some((block, burst_id))
    }

    pub fn bursts(&self) -> &ParticleBursts {
        &self.bursts
    }

    pub fn advance_bursts(&mut self) -> usize {
        self.bursts.advance(&mut self.scene)
    }

    pub fn apply_lighting(&mut self, lighting: &LightingPreset) {
        self.scene.apply_lighting(lighting);
    }

    /// Detaches everything from the scene and empties the world.
    pub fn clear(&mut self) {
        for (id, _) in self.blocks.drain(..) {
            self.scene.detach_block(id);
        }
        self.bursts.clear(&mut self.scene);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{World, WorldError};
    use crate::block::{Block, BlockKind, Color};
    use crate::testing::RecordingScene;

    fn cube(x: f32) -> Block {
        Block::cube(BlockKind::Placed, Vec3::new(x, 0.25, 0.0), Color::from_hex(0xff0000))
    }

    #[test]
    fn add_attaches_to_scene_in_order() {
        let mut world = World::new(RecordingScene::default());
        let a = world.add(cube(0.0)).expect("add");
        let b = world.add(cube(1.0)).expect("add");

        let ids: Vec<_> = world.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(world.scene().blocks.len(), 2);
        assert_eq!(world.get(b).map(|block| block.position.x), Some(1.0));
    }

    #[test]
    fn remove_detaches_from_scene_in_same_step() {
        let mut world = World::new(RecordingScene::default());
        let a = world.add(cube(0.0)).expect("add");
        let b = world.add(cube(1.0)).expect("add");
        let c = world.add(cube(2.0)).expect("add");

        assert!(world.remove(b).is_some());
        assert!(world.scene().is_consistent_with(&world));
        assert!(!world.scene().blocks.contains_key(&b));

        let ids: Vec<_> = world.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(world.remove(b).is_none());
    }

    #[test]
    fn block_limit_is_enforced() {
        let mut world = World::with_limits(RecordingScene::default(), 2, 4);
        world.add(cube(0.0)).expect("add");
        world.add(cube(1.0)).expect("add");
        assert_eq!(
            world.add(cube(2.0)),
            Err(WorldError::BlockLimitReached { limit: 2 })
        );
        assert_eq!(world.scene().blocks.len(), 2);
    }

    #[test]
    fn shatter_swaps_block_for_burst() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut world = World::new(RecordingScene::default());
        let id = world.add(cube(4.0)).expect("add");

        let (block, burst_id) = world.shatter(id, &mut rng).expect("shatter");
        assert_eq!(block.position.x, 4.0);
        assert!(world.is_empty());
        assert!(world.scene().blocks.is_empty());

        let burst = world.bursts().get(burst_id).expect("burst");
        assert_eq!(burst.color, block.color);
        assert_eq!(burst.age(), 1);
        assert!((burst.origin.y - (block.position.y - 0.02)).abs() < 1e-6);
        assert!((burst.opacity() - 0.99).abs() < 1e-6);
        assert_eq!(world.scene().bursts.get(&burst_id), Some(burst));
    }

    #[test]
    fn clear_empties_world_and_scene() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut world = World::new(RecordingScene::default());
        let id = world.add(cube(0.0)).expect("add");
        world.add(cube(1.0)).expect("add");
        world.shatter(id, &mut rng);

        world.clear();
        assert!(world.is_empty());
        assert!(world.bursts().is_empty());
        assert!(world.scene().blocks.is_empty());
        assert!(world.scene().bursts.is_empty());
    }
}
