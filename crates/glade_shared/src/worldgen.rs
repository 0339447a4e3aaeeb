use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::block::{Block, BlockKind, Color};
use crate::player::{GRID_HEIGHT, REST_HEIGHT};
use crate::world::{Scene, World, WorldError};

pub const WORLD_HALF_EXTENT: f32 = 100.0;
pub const GROUND_SIZE: f32 = 200.0;
pub const PLATFORM_SIZE: f32 = 10.0;
pub const PLATFORM_HEIGHT: f32 = 2.0;
pub const TREE_COUNT: usize = 10;
pub const HILL_COUNT: usize = 20;
pub const TRUNK_TOP_COUNT: usize = 3;
pub const LEAF_COUNT: usize = 27;
pub const BLOCKS_PER_TREE: usize = 1 + TRUNK_TOP_COUNT + LEAF_COUNT;

const GROUND_COLOR: Color = Color::from_hex(0x4CAF50);
const PLATFORM_COLOR: Color = Color::from_hex(0xaaaaaa);
const TRUNK_COLOR: Color = Color::from_hex(0x8B4513);
const LEAF_COLOR: Color = Color::from_hex(0x00ff00);
const LEAF_OPACITY: f32 = 0.7;
const HILL_COLOR: Color = Color::from_hex(0x00ff00);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub tree_blocks: usize,
    pub hills: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct WorldGenerator {
    pub seed: u64,
}

impl WorldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn generate<S: Scene>(&self, world: &mut World<S>) -> Result<GenerationSummary, WorldError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let summary = populate(world, &mut rng)?;
        info!(
            seed = self.seed,
            total = summary.total,
            trees = TREE_COUNT,
            hills = summary.hills,
            "world generated"
        );
        Ok(summary)
    }
}

/// Fills `world` with ground, platform, trees and hills, in that order.
pub fn populate<S: Scene, R: Rng + ?Sized>(
    world: &mut World<S>,
    rng: &mut R,
) -> Result<GenerationSummary, WorldError> {
    let mut summary = GenerationSummary::default();

    world.add(Block::new(
        BlockKind::Ground,
        Vec3::ZERO,
        Vec3::new(GROUND_SIZE, 0.0, GROUND_SIZE),
        GROUND_COLOR,
    ))?;
    world.add(Block::new(
        BlockKind::Platform,
        Vec3::new(0.0, REST_HEIGHT + 1.0, 0.0),
        Vec3::new(PLATFORM_SIZE, PLATFORM_HEIGHT, PLATFORM_SIZE),
        PLATFORM_COLOR,
    ))?;
    summary.total += 2;

    for _ in 0..TREE_COUNT {
        let x = random_coordinate(rng);
        let z = random_coordinate(rng);
        for block in tree_blocks(x, z) {
            world.add(block)?;
            summary.tree_blocks += 1;
        }
    }

    for _ in 0..HILL_COUNT {
        world.add(random_hill(rng))?;
        summary.hills += 1;
    }

    summary.total += summary.tree_blocks + summary.hills;
    Ok(summary)
}

fn random_coordinate<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(-WORLD_HALF_EXTENT..WORLD_HALF_EXTENT)
}

/// Trunk, the stacked trunk tops above it, then a 3x3x3 leaf canopy.
pub fn tree_blocks(x: f32, z: f32) -> Vec<Block> {
    let trunk_y = GRID_HEIGHT / 2.0;
    let mut blocks = Vec::with_capacity(BLOCKS_PER_TREE);

    blocks.push(Block::new(
        BlockKind::Trunk,
        Vec3::new(x, trunk_y, z),
        Vec3::new(1.0, 2.0, 1.0),
        TRUNK_COLOR,
    ));

    for level in 0..TRUNK_TOP_COUNT {
        blocks.push(Block::cube(
            BlockKind::TrunkTop,
            Vec3::new(x, 2.0 + level as f32, z),
            TRUNK_COLOR,
        ));
    }

    for k in 0..LEAF_COUNT {
        let layer = k % 9;
        let offset = Vec3::new(
            (layer % 3) as f32 - 1.0,
            (layer / 3) as f32 + 4.0,
            (k / 9) as f32 - 1.0,
        );
        blocks.push(
            Block::cube(BlockKind::Leaves, Vec3::new(x, trunk_y, z) + offset, LEAF_COLOR)
                .with_opacity(LEAF_OPACITY)
                .decorative(),
        );
    }

    blocks
}

fn random_hill<R: Rng + ?Sized>(rng: &mut R) -> Block {
    let width = rng.gen_range(5..10) as f32;
    let depth = rng.gen_range(5..10) as f32;
    let x = random_coordinate(rng);
    let z = random_coordinate(rng);
    Block::new(
        BlockKind::Hill,
        Vec3::new(x, GRID_HEIGHT / 2.0, z),
        Vec3::new(width, 1.0, depth),
        HILL_COLOR,
    )
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{tree_blocks, WorldGenerator, BLOCKS_PER_TREE};
    use crate::block::BlockKind;
    use crate::testing::RecordingScene;
    use crate::world::{World, WorldError};

    #[test]
    fn seeded_generation_produces_expected_counts() {
        let mut world = World::new(RecordingScene::default());
        let summary = WorldGenerator::new(42).generate(&mut world).unwrap();

        assert_eq!(summary.tree_blocks, 310);
        assert_eq!(summary.hills, 20);
        assert_eq!(summary.total, 332);
        assert_eq!(world.len(), 332);
        assert!(world.scene().is_consistent_with(&world));

        let kinds: Vec<BlockKind> = world.iter().map(|(_, block)| block.kind).collect();
        assert_eq!(kinds[0], BlockKind::Ground);
        assert_eq!(kinds[1], BlockKind::Platform);
        assert_eq!(kinds.iter().filter(|k| **k == BlockKind::Leaves).count(), 270);
        assert_eq!(kinds.iter().filter(|k| **k == BlockKind::Hill).count(), 20);
    }

    #[test]
    fn same_seed_same_world() {
        let mut a = World::new(RecordingScene::default());
        let mut b = World::new(RecordingScene::default());
        WorldGenerator::new(7).generate(&mut a).unwrap();
        WorldGenerator::new(7).generate(&mut b).unwrap();

        assert!(a.iter().zip(b.iter()).all(|((_, x), (_, y))| x == y));
    }

    #[test]
    fn generated_blocks_stay_inside_ground_and_use_expected_sizes() {
        let mut world = World::new(RecordingScene::default());
        WorldGenerator::new(3).generate(&mut world).unwrap();

        for (_, block) in world.iter() {
            assert!(block.position.x.abs() <= 102.0 && block.position.z.abs() <= 102.0);
            if block.kind == BlockKind::Hill {
                assert!((5.0..=9.0).contains(&block.size.x));
                assert!((5.0..=9.0).contains(&block.size.z));
                assert_eq!(block.size.y, 1.0);
                assert!(block.collision);
            }
        }
    }

    #[test]
    fn tree_layout_matches_canopy_pattern() {
        let blocks = tree_blocks(10.0, -20.0);
        assert_eq!(blocks.len(), BLOCKS_PER_TREE);

        assert_eq!(blocks[0].position, Vec3::new(10.0, 0.25, -20.0));
        assert_eq!(blocks[0].size, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(blocks[3].position.y, 4.0);

        let first_leaf = &blocks[4];
        assert_eq!(first_leaf.position, Vec3::new(9.0, 4.25, -21.0));
        assert!(!first_leaf.collision);
        assert_eq!(first_leaf.opacity, 0.7);

        let last_leaf = &blocks[BLOCKS_PER_TREE - 1];
        assert_eq!(last_leaf.position, Vec3::new(11.0, 6.25, -19.0));
    }

    #[test]
    fn generation_respects_block_limit() {
        let mut world = World::with_limits(RecordingScene::default(), 100, 8);
        let result = WorldGenerator::new(1).generate(&mut world);

        assert_eq!(result, Err(WorldError::BlockLimitReached { limit: 100 }));
        assert_eq!(world.len(), 100);
        assert!(world.scene().is_consistent_with(&world));
    }
}
