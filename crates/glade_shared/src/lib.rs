pub mod block;
pub mod collision;
pub mod day_night;
pub mod game;
pub mod hotbar;
pub mod hud;
pub mod input;
pub mod interaction;
pub mod particles;
pub mod physics;
pub mod player;
pub mod world;
pub mod worldgen;

#[cfg(test)]
pub(crate) mod testing;
