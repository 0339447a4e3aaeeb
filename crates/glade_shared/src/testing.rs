use std::collections::BTreeMap;

use crate::block::{Block, BlockId};
use crate::day_night::LightingPreset;
use crate::particles::{BurstId, ParticleBurst};
use crate::world::{Scene, World};

/// Scene double that mirrors whatever the world attaches.
#[derive(Debug, Default)]
pub struct RecordingScene {
    pub blocks: BTreeMap<BlockId, Block>,
    pub bursts: BTreeMap<BurstId, ParticleBurst>,
    pub lighting: Option<LightingPreset>,
    pub lighting_changes: usize,
}

impl RecordingScene {
    pub fn is_consistent_with(&self, world: &World<RecordingScene>) -> bool {
        self.blocks.len() == world.len()
            && world
                .iter()
                .all(|(id, block)| self.blocks.get(&id) == Some(block))
    }
}

impl Scene for RecordingScene {
    fn attach_block(&mut self, id: BlockId, block: &Block) {
        self.blocks.insert(id, block.clone());
    }

    fn detach_block(&mut self, id: BlockId) {
        self.blocks.remove(&id);
    }

    fn attach_burst(&mut self, id: BurstId, burst: &ParticleBurst) {
        self.bursts.insert(id, burst.clone());
    }

    fn update_burst(&mut self, id: BurstId, burst: &ParticleBurst) {
        self.bursts.insert(id, burst.clone());
    }

    fn detach_burst(&mut self, id: BurstId) {
        self.bursts.remove(&id);
    }

    fn apply_lighting(&mut self, lighting: &LightingPreset) {
        self.lighting = Some(*lighting);
        self.lighting_changes += 1;
    }
}
