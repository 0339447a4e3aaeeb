use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use crate::block::Color;
use crate::world::Scene;

pub const BURST_POINT_COUNT: usize = 100;
pub const BURST_POINT_SIZE: f32 = 0.1;
const BURST_SPREAD: f32 = 1.0;
const BURST_FALL_PER_TICK: f32 = 0.02;
const BURST_FADE_PER_TICK: f32 = 0.01;
/// Ticks until a burst has faded out completely.
pub const BURST_LIFETIME_TICKS: u32 = 100;
pub const DEFAULT_MAX_BURSTS: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BurstId(pub u32);

/// Point cloud left behind by a broken block. Drifts down and fades out.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleBurst {
    pub origin: Vec3,
    /// Offsets relative to `origin`.
    pub points: Vec<Vec3>,
    pub color: Color,
    age: u32,
    spawn_y: f32,
}

impl ParticleBurst {
    pub fn new<R: Rng + ?Sized>(origin: Vec3, color: Color, rng: &mut R) -> Self {
        let points = (0..BURST_POINT_COUNT)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-BURST_SPREAD..BURST_SPREAD),
                    rng.gen_range(-BURST_SPREAD..BURST_SPREAD),
                    rng.gen_range(-BURST_SPREAD..BURST_SPREAD),
                )
            })
            .collect();

        Self {
            origin,
            points,
            color,
            age: 0,
            spawn_y: origin.y,
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn opacity(&self) -> f32 {
        (1.0 - self.age as f32 * BURST_FADE_PER_TICK).max(0.0)
    }

    pub fn is_faded(&self) -> bool {
        self.age >= BURST_LIFETIME_TICKS
    }

    /// Moves the burst one tick forward. Returns `false` once it has faded.
    pub fn advance(&mut self) -> bool {
        if self.is_faded() {
            return false;
        }
        self.age += 1;
        self.origin.y = self.spawn_y - self.age as f32 * BURST_FALL_PER_TICK;
        !self.is_faded()
    }
}

/// Bounded set of live bursts. When full, the oldest burst is dropped to make
/// room for a new one.
#[derive(Debug)]
pub struct ParticleBursts {
    active: VecDeque<(BurstId, ParticleBurst)>,
    capacity: usize,
    next_id: u32,
}

impl ParticleBursts {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            active: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, id: BurstId) -> Option<&ParticleBurst> {
        self.active
            .iter()
            .find(|(burst_id, _)| *burst_id == id)
            .map(|(_, burst)| burst)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BurstId, &ParticleBurst)> {
        self.active.iter().map(|(id, burst)| (*id, burst))
    }

    pub fn spawn<S: Scene>(&mut self, scene: &mut S, burst: ParticleBurst) -> BurstId {
        if self.active.len() >= self.capacity {
            if let Some((evicted, _)) = self.active.pop_front() {
                scene.detach_burst(evicted);
            }
        }

        let id = BurstId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        scene.attach_burst(id, &burst);
        self.active.push_back((id, burst));
        id
    }

    /// Advances every burst and detaches the ones that faded. Returns how many
    /// were removed.
    pub fn advance<S: Scene>(&mut self, scene: &mut S) -> usize {
        let before = self.active.len();
        self.active.retain_mut(|(id, burst)| {
            if burst.advance() {
                scene.update_burst(*id, burst);
                true
            } else {
                scene.detach_burst(*id);
                false
            }
        });
        before - self.active.len()
    }

    pub fn clear<S: Scene>(&mut self, scene: &mut S) {
        for (id, _) in self.active.drain(..) {
            scene.detach_burst(id);
        }
    }
}
