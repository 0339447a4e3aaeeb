use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use glade_shared::game::GameConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const SETTINGS_PATH: &str = "settings.toml";

const MIN_MOUSE_SENSITIVITY: f32 = 0.5;
const MAX_MOUSE_SENSITIVITY: f32 = 5.0;
const MIN_FOV: f32 = 60.0;
const MAX_FOV: f32 = 120.0;
const MIN_DAY_LENGTH_SECS: f32 = 1.0;
const MAX_DAY_LENGTH_SECS: f32 = 3600.0;
const MIN_MAX_BLOCKS: usize = 1024;
const MAX_MAX_BLOCKS: usize = 1_048_576;
const MIN_PARTICLE_BURSTS: usize = 1;
const MAX_PARTICLE_BURSTS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// Fixed world seed. A fresh random seed is drawn each launch when unset.
    #[serde(default)]
    pub world_seed: Option<u64>,
    #[serde(default = "default_day_length_secs")]
    pub day_length_secs: f32,
    #[serde(default = "default_max_blocks")]
    pub max_blocks: usize,
    #[serde(default = "default_max_particle_bursts")]
    pub max_particle_bursts: usize,
    #[serde(default)]
    pub show_fps: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: default_mouse_sensitivity(),
            fov: default_fov(),
            world_seed: None,
            day_length_secs: default_day_length_secs(),
            max_blocks: default_max_blocks(),
            max_particle_bursts: default_max_particle_bursts(),
            show_fps: false,
        }
    }
}

impl GameSettings {
    pub fn sanitize(mut self) -> Self {
        self.mouse_sensitivity = self
            .mouse_sensitivity
            .clamp(MIN_MOUSE_SENSITIVITY, MAX_MOUSE_SENSITIVITY);
        self.fov = self.fov.clamp(MIN_FOV, MAX_FOV);
        if !self.day_length_secs.is_finite() {
            self.day_length_secs = default_day_length_secs();
        }
        self.day_length_secs = self
            .day_length_secs
            .clamp(MIN_DAY_LENGTH_SECS, MAX_DAY_LENGTH_SECS);
        self.max_blocks = self.max_blocks.clamp(MIN_MAX_BLOCKS, MAX_MAX_BLOCKS);
        self.max_particle_bursts = self
            .max_particle_bursts
            .clamp(MIN_PARTICLE_BURSTS, MAX_PARTICLE_BURSTS);
        self
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let parsed = toml::from_str::<Self>(&contents).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to deserialize settings: {e}"),
            )
        })?;
        Ok(parsed.sanitize())
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let settings = self.clone().sanitize();
        let serialized = toml::to_string_pretty(&settings).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize settings: {e}"),
            )
        })?;
        fs::write(path, serialized)
    }

    pub fn game_config(&self, seed: u64) -> GameConfig {
        GameConfig {
            seed,
            day_length: Duration::from_secs_f32(self.day_length_secs),
            max_blocks: self.max_blocks,
            max_particle_bursts: self.max_particle_bursts,
        }
    }
}

fn default_mouse_sensitivity() -> f32 {
    2.5
}

fn default_fov() -> f32 {
    75.0
}

fn default_day_length_secs() -> f32 {
    150.0
}

fn default_max_blocks() -> usize {
    glade_shared::world::DEFAULT_MAX_BLOCKS
}

fn default_max_particle_bursts() -> usize {
    glade_shared::particles::DEFAULT_MAX_BURSTS
}

/// Loads settings, writing defaults back when the file is missing or broken.
pub fn load_or_create_settings(path: &Path) -> GameSettings {
    match GameSettings::load(path) {
        Ok(settings) => settings,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let settings = GameSettings::default();
            if let Err(save_err) = settings.save(path) {
                warn!(
                    "Failed to create default settings at {}: {save_err}",
                    path.display()
                );
            }
            settings
        }
        Err(err) => {
            warn!("Failed to load settings from {}: {err}", path.display());
            let settings = GameSettings::default();
            if let Err(save_err) = settings.save(path) {
                warn!(
                    "Failed to overwrite settings at {}: {save_err}",
                    path.display()
                );
            }
            settings
        }
    }
}
