use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::block::{Block, BlockId, BlockKind, Color};
use crate::particles::BurstId;
use crate::physics::Ray;
use crate::player::{GRID_HEIGHT, GRID_SIZE};
use crate::world::{Scene, World, WorldError};

/// How far in front of the camera a new block lands.
pub const PLACE_DISTANCE: f32 = 2.0;
/// Blocks whose center is closer than this to the player can be broken.
pub const BREAK_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BrokenBlock {
    pub id: BlockId,
    pub block: Block,
    pub burst: BurstId,
}

/// Rounds halves towards positive infinity.
pub fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

/// Whole units on x and z. On y, half-unit steps offset by a quarter unit.
pub fn snap_to_grid(point: Vec3) -> Vec3 {
    Vec3::new(
        round_half_up(point.x / GRID_SIZE) * GRID_SIZE,
        round_half_up(point.y / GRID_HEIGHT) * GRID_HEIGHT + GRID_HEIGHT / 2.0,
        round_half_up(point.z / GRID_SIZE) * GRID_SIZE,
    )
}

pub fn placement_target(eye: Vec3, look: Vec3) -> Vec3 {
    snap_to_grid(eye + look * PLACE_DISTANCE)
}

/// Appends a unit block in front of the camera. Occupied cells are not
/// checked.
pub fn place_block<S: Scene>(
    world: &mut World<S>,
    eye: Vec3,
    look: Vec3,
    color: Color,
) -> Result<BlockId, WorldError> {
    let position = placement_target(eye, look);
    let id = world.add(Block::cube(BlockKind::Placed, position, color))?;
    debug!(?id, x = position.x, y = position.y, z = position.z, "block placed");
    Ok(id)
}

pub fn ray_hits_any<S: Scene>(world: &World<S>, ray: &Ray) -> bool {
    world
        .iter()
        .any(|(_, block)| ray.intersect_aabb(&block.bounds()).is_some())
}

/// First breakable block in world order whose center is within
/// [`BREAK_RADIUS`] of `player`.
pub fn break_candidate<S: Scene>(world: &World<S>, player: Vec3) -> Option<BlockId> {
    world
        .iter()
        .find(|(_, block)| {
            block.kind.is_breakable() && player.distance(block.position) < BREAK_RADIUS
        })
        .map(|(id, _)| id)
}

/// Breaks one block near the player, provided the crosshair ray touches some
/// block. The broken block need not be the one the ray hit.
pub fn break_block<S: Scene, R: Rng + ?Sized>(
    world: &mut World<S>,
    ray: &Ray,
    player: Vec3,
    rng: &mut R,
) -> Option<BrokenBlock> {
    if !ray_hits_any(world, ray) {
        return None;
    }
    let id = break_candidate(world, player)?;
    let (block, burst) = world.shatter(id, rng)?;
    Some(BrokenBlock { id, block, burst })
}
