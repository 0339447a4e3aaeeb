use crate::block::BlockId;
use crate::player::{Player, PLAYER_HEIGHT};
use crate::world::{Scene, World};

/// Snaps the player on top of every collidable block it overlaps. The player
/// box is taken once before the scan, so with several overlaps the last one in
/// world order decides the final height. Horizontal penetration is left alone.
pub fn resolve_vertical<S: Scene>(player: &mut Player, world: &World<S>) -> Option<BlockId> {
    let bounds = player.bounds();
    let mut resolved = None;

    for (id, block) in world.iter() {
        if !block.collision || !bounds.intersects(&block.bounds()) {
            continue;
        }
        player.position.y = block.position.y + block.height() + PLAYER_HEIGHT / 2.0;
        resolved = Some(id);
    }

    resolved
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::resolve_vertical;
    use crate::block::{Block, BlockKind, Color};
    use crate::player::Player;
    use crate::testing::RecordingScene;
    use crate::world::World;

    fn world_with(blocks: Vec<Block>) -> World<RecordingScene> {
        let mut world = World::new(RecordingScene::default());
        for block in blocks {
            world.add(block).unwrap();
        }
        world
    }

    #[test]
    fn overlap_snaps_player_above_block() {
        let block = Block::cube(BlockKind::Placed, Vec3::new(0.0, 0.5, 0.0), Color(0));
        let world = world_with(vec![block]);
        let mut player = Player::new(Vec3::new(0.2, 1.2, 0.0));

        let hit = resolve_vertical(&mut player, &world);
        assert!(hit.is_some());
        assert_eq!(player.position.y, 0.5 + 1.0 + 1.0);
    }

    #[test]
    fn decorative_blocks_are_ignored() {
        let leaves = Block::cube(BlockKind::Leaves, Vec3::new(0.0, 0.5, 0.0), Color(0)).decorative();
        let world = world_with(vec![leaves]);
        let mut player = Player::new(Vec3::new(0.0, 1.2, 0.0));

        assert_eq!(resolve_vertical(&mut player, &world), None);
        assert_eq!(player.position.y, 1.2);
    }

    #[test]
    fn last_overlapping_block_wins() {
        let low = Block::cube(BlockKind::Placed, Vec3::new(0.0, 0.5, 0.0), Color(0));
        let tall = Block::new(
            BlockKind::Hill,
            Vec3::new(0.5, 0.25, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Color(0),
        );
        let world = world_with(vec![low, tall]);
        let mut player = Player::new(Vec3::new(0.2, 1.2, 0.0));

        let hit = resolve_vertical(&mut player, &world);
        assert_eq!(hit, Some(world.iter().nth(1).unwrap().0));
        assert_eq!(player.position.y, 0.25 + 1.0 + 1.0);
    }

    #[test]
    fn touching_faces_do_not_collide() {
        let block = Block::cube(BlockKind::Placed, Vec3::new(0.0, 0.5, 0.0), Color(0));
        let world = world_with(vec![block]);
        let mut player = Player::new(Vec3::new(0.0, 2.0, 0.0));

        assert_eq!(resolve_vertical(&mut player, &world), None);
    }
}
