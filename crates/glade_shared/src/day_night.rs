use std::time::{Duration, Instant};

use glade_core::schedule::RepeatingTask;
use glam::Vec3;
use tracing::info;

use crate::block::Color;
use crate::world::{Scene, World};

pub const DEFAULT_DAY_LENGTH: Duration = Duration::from_secs(150);
pub const SUN_POSITION: Vec3 = Vec3::new(-100.0, 40.0, -100.0);
pub const SUN_SIZE: f32 = 10.0;
pub const SUN_COLOR: Color = Color::from_hex(0xffff00);
pub const LIGHT_POSITION: Vec3 = Vec3::new(-100.0, 30.0, -100.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingPreset {
    pub directional_intensity: f32,
    pub ambient_intensity: f32,
    pub background: Color,
    pub sun_visible: bool,
}

pub const DAY_LIGHTING: LightingPreset = LightingPreset {
    directional_intensity: 1.0,
    ambient_intensity: 0.5,
    background: Color::from_hex(0x87CEEB),
    sun_visible: true,
};

pub const NIGHT_LIGHTING: LightingPreset = LightingPreset {
    directional_intensity: 0.2,
    ambient_intensity: 0.1,
    background: Color::from_hex(0x000000),
    sun_visible: false,
};

/// Stepped day/night toggle. Each elapsed interval flips the mode and pushes
/// the matching preset to the scene at once; there is no blending.
#[derive(Debug, Clone)]
pub struct DayNightCycle {
    is_day: bool,
    task: RepeatingTask,
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_LENGTH)
    }
}

impl DayNightCycle {
    pub fn new(interval: Duration) -> Self {
        Self {
            is_day: true,
            task: RepeatingTask::new(interval),
        }
    }

    pub fn is_day(&self) -> bool {
        self.is_day
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    pub fn interval(&self) -> Duration {
        self.task.interval()
    }

    pub fn lighting(&self) -> LightingPreset {
        if self.is_day {
            DAY_LIGHTING
        } else {
            NIGHT_LIGHTING
        }
    }

    /// Starts in daytime and pushes the day preset.
    pub fn start<S: Scene>(&mut self, now: Instant, world: &mut World<S>) {
        self.is_day = true;
        self.task.start(now);
        world.apply_lighting(&self.lighting());
    }

    pub fn stop(&mut self) {
        self.task.stop();
    }

    /// Applies every toggle that came due since the last poll. Returns the
    /// number of toggles.
    pub fn poll<S: Scene>(&mut self, now: Instant, world: &mut World<S>) -> u32 {
        let toggles = self.task.poll(now);
        for _ in 0..toggles {
            self.is_day = !self.is_day;
            world.apply_lighting(&self.lighting());
            info!(is_day = self.is_day, "day/night toggled");
        }
        toggles
    }
}
