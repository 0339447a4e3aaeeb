//! Top-level game state and the per-tick update.
//!
//! The client owns one `Game` and drives it from the event loop: key and
//! mouse handlers call straight into it between ticks, and `tick` runs the
//! fixed simulation step.

use std::time::{Duration, Instant};

use glade_core::events::EventSender;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::block::{BlockId, Color};
use crate::collision::resolve_vertical;
use crate::day_night::{DayNightCycle, DEFAULT_DAY_LENGTH};
use crate::hotbar::Hotbar;
use crate::hud::HudView;
use crate::input::{InputState, MoveKey};
use crate::interaction::{break_block, place_block, BrokenBlock};
use crate::particles::{BurstId, DEFAULT_MAX_BURSTS};
use crate::physics::Ray;
use crate::player::Player;
use crate::world::{Scene, World, WorldError, DEFAULT_MAX_BLOCKS};
use crate::worldgen::{GenerationSummary, WorldGenerator};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BlockPlaced { id: BlockId, position: Vec3, color: Color },
    BlockBroken { id: BlockId, position: Vec3, burst: BurstId },
    DayNightChanged { is_day: bool },
    BlockLimitReached { limit: usize },
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub seed: u64,
    pub day_length: Duration,
    pub max_blocks: usize,
    pub max_particle_bursts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            day_length: DEFAULT_DAY_LENGTH,
            max_blocks: DEFAULT_MAX_BLOCKS,
            max_particle_bursts: DEFAULT_MAX_BURSTS,
        }
    }
}

pub struct Game<S: Scene> {
    world: World<S>,
    player: Player,
    input: InputState,
    hotbar: Hotbar,
    day_night: DayNightCycle,
    rng: StdRng,
    events: EventSender<GameEvent>,
    generation: GenerationSummary,
}

impl<S: Scene> Game<S> {
    /// Builds the world from `config.seed`. Fails only if the generated world
    /// would exceed the block limit.
    pub fn new(
        scene: S,
        config: &GameConfig,
        events: EventSender<GameEvent>,
    ) -> Result<Self, WorldError> {
        let mut world = World::with_limits(scene, config.max_blocks, config.max_particle_bursts);
        let generation = WorldGenerator::new(config.seed).generate(&mut world)?;

        let mut player = Player::default();
        player.clamp_to_floor();

        Ok(Self {
            world,
            player,
            input: InputState::default(),
            hotbar: Hotbar::default(),
            day_night: DayNightCycle::new(config.day_length),
            rng: StdRng::seed_from_u64(config.seed ^ 0x5eed_b10c),
            events,
            generation,
        })
    }

    pub fn start(&mut self, now: Instant) {
        self.day_night.start(now, &mut self.world);
    }

    pub fn stop(&mut self) {
        self.day_night.stop();
    }

    /// One fixed simulation step.
    pub fn tick(&mut self, look: Vec3, now: Instant) {
        if self.day_night.poll(now, &mut self.world) % 2 == 1 {
            self.events.emit(GameEvent::DayNightChanged {
                is_day: self.day_night.is_day(),
            });
        }

        self.player.apply_gravity();
        self.player.apply_movement(self.input.moves(), look);
        resolve_vertical(&mut self.player, &self.world);
        self.player.clamp_to_floor();

        self.world.advance_bursts();
    }

    pub fn hud(&self) -> HudView {
        HudView::derive(self.player.position, self.world.len(), &self.hotbar)
    }

    pub fn press(&mut self, key: MoveKey) {
        self.input.press(key);
    }

    pub fn release(&mut self, key: MoveKey) {
        self.input.release(key);
    }

    pub fn jump(&mut self, now: Instant) -> bool {
        self.player.jump(&mut self.input, now)
    }

    /// Places a block of the selected color in front of the camera. The block
    /// limit is reported through the event channel, never to the caller.
    pub fn place(&mut self, look: Vec3) -> Option<BlockId> {
        let color = self.hotbar.color();
        match place_block(&mut self.world, self.player.position, look, color) {
            Ok(id) => {
                let position = self.world.get(id).map_or(Vec3::ZERO, |block| block.position);
                self.events.emit(GameEvent::BlockPlaced { id, position, color });
                Some(id)
            }
            Err(WorldError::BlockLimitReached { limit }) => {
                warn!(limit, "block limit reached, placement dropped");
                self.events.emit(GameEvent::BlockLimitReached { limit });
                None
            }
        }
    }

    /// Breaks one block near the player if `ray` touches any block.
    pub fn break_target(&mut self, ray: &Ray) -> Option<BrokenBlock> {
        let broken = break_block(&mut self.world, ray, self.player.position, &mut self.rng)?;
        self.events.emit(GameEvent::BlockBroken {
            id: broken.id,
            position: broken.block.position,
            burst: broken.burst,
        });
        Some(broken)
    }

    pub fn select_slot(&mut self, slot: usize) -> bool {
        self.hotbar.select(slot)
    }

    pub fn cycle_slot(&mut self, delta: i32) {
        self.hotbar.cycle(delta);
    }

    /// Drops held keys, used when the pointer lock is lost.
    pub fn release_all(&mut self) {
        self.input.release_all();
    }

    pub fn world(&self) -> &World<S> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<S> {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn hotbar(&self) -> &Hotbar {
        &self.hotbar
    }

    pub fn is_day(&self) -> bool {
        self.day_night.is_day()
    }

    pub fn generation(&self) -> GenerationSummary {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use glade_core::events::{channel, EventReceiver};
    use glam::Vec3;

    use super::{Game, GameConfig, GameEvent};
    use crate::block::{BlockKind, PALETTE};
    use crate::day_night::{DAY_LIGHTING, NIGHT_LIGHTING};
    use crate::input::MoveKey;
    use crate::physics::Ray;
    use crate::player::{MOVE_SPEED, REST_HEIGHT};
    use crate::testing::RecordingScene;

    fn game(config: GameConfig) -> (Game<RecordingScene>, EventReceiver<GameEvent>) {
        let (tx, rx) = channel();
        let game = Game::new(RecordingScene::default(), &config, tx).unwrap();
        (game, rx)
    }

    /// Moves the player well away from the platform and any generated block.
    fn move_to_open_ground(game: &mut Game<RecordingScene>) {
        game.world_mut().clear();
        game.player.position = Vec3::new(0.0, REST_HEIGHT, 0.0);
    }

    #[test]
    fn new_game_has_full_world_and_day_lighting() {
        let start = Instant::now();
        let (mut game, _rx) = game(GameConfig::default());
        game.start(start);

        assert_eq!(game.world().len(), 332);
        assert_eq!(game.generation().total, 332);
        assert_eq!(game.world().scene().lighting, Some(DAY_LIGHTING));
        assert!(game.player().position.y >= REST_HEIGHT);
    }

    #[test]
    fn held_key_moves_player_each_tick() {
        let start = Instant::now();
        let (mut game, _rx) = game(GameConfig::default());
        move_to_open_ground(&mut game);
        game.start(start);

        game.press(MoveKey::Forward);
        game.tick(Vec3::NEG_Z, start);
        game.tick(Vec3::NEG_Z, start);
        game.release(MoveKey::Forward);
        game.tick(Vec3::NEG_Z, start);

        let position = game.player().position;
        assert!((position.z + 2.0 * MOVE_SPEED).abs() < 1e-5);
        assert_eq!(position.y, REST_HEIGHT);
    }

    #[test]
    fn jump_then_fall_back_to_floor() {
        let start = Instant::now();
        let (mut game, _rx) = game(GameConfig::default());
        move_to_open_ground(&mut game);
        game.start(start);

        assert!(game.jump(start));
        assert!(!game.jump(start + Duration::from_millis(10)));
        assert_eq!(game.player().position.y, REST_HEIGHT + 1.0);

        for _ in 0..30 {
            game.tick(Vec3::NEG_Z, start);
        }
        assert_eq!(game.player().position.y, REST_HEIGHT);
        assert!(game.jump(start + Duration::from_millis(600)));
    }

    #[test]
    fn standing_on_a_placed_block() {
        let start = Instant::now();
        let (mut game, _rx) = game(GameConfig::default());
        move_to_open_ground(&mut game);
        game.start(start);

        assert!(game.jump(start));
        let id = game.place(Vec3::NEG_Y).unwrap();
        let block = game.world().get(id).unwrap().clone();
        game.tick(Vec3::NEG_Z, start);

        assert_eq!(
            game.player().position.y,
            block.position.y + block.height() + 1.0
        );
    }

    #[test]
    fn place_and_break_emit_events_and_keep_scene_in_sync() {
        let start = Instant::now();
        let (mut game, rx) = game(GameConfig::default());
        move_to_open_ground(&mut game);
        game.start(start);
        game.select_slot(5);

        let id = game.place(Vec3::Z).unwrap();
        let eye = game.player().position;
        let broken = game.break_target(&Ray::new(eye, Vec3::Z)).unwrap();
        assert_eq!(broken.id, id);
        assert!(game.world().is_empty());
        assert!(game.world().scene().is_consistent_with(game.world()));
        assert_eq!(game.world().scene().bursts.len(), 1);

        let events: Vec<GameEvent> = rx.drain().collect();
        assert!(matches!(
            events[0],
            GameEvent::BlockPlaced { color, .. } if color == PALETTE[5]
        ));
        assert!(matches!(events[1], GameEvent::BlockBroken { id: broken_id, .. } if broken_id == id));
    }

    #[test]
    fn breaking_at_spawn_keeps_the_platform() {
        let start = Instant::now();
        let (mut game, _rx) = game(GameConfig::default());
        game.start(start);
        for _ in 0..10 {
            game.tick(Vec3::NEG_Z, start);
        }

        let platform = game
            .world()
            .iter()
            .find(|(_, block)| block.kind == BlockKind::Platform)
            .map(|(id, _)| id)
            .unwrap();
        let eye = game.player().position;
        assert!(eye.distance(game.world().get(platform).unwrap().position) < 3.0);

        if let Some(broken) = game.break_target(&Ray::new(eye, Vec3::NEG_Y)) {
            assert!(broken.block.kind.is_breakable());
        }
        assert!(game.world().get(platform).is_some());
        assert!(game.world().scene().blocks.contains_key(&platform));
    }

    #[test]
    fn bursts_fade_out_through_ticks() {
        let start = Instant::now();
        let (mut game, _rx) = game(GameConfig::default());
        move_to_open_ground(&mut game);
        game.start(start);

        game.place(Vec3::Z).unwrap();
        let eye = game.player().position;
        game.break_target(&Ray::new(eye, Vec3::Z)).unwrap();

        for _ in 0..100 {
            game.tick(Vec3::NEG_Z, start);
        }
        assert!(game.world().bursts().is_empty());
        assert!(game.world().scene().bursts.is_empty());
    }

    #[test]
    fn day_night_switches_inside_tick() {
        let start = Instant::now();
        let config = GameConfig {
            day_length: Duration::from_secs(150),
            ..GameConfig::default()
        };
        let (mut game, rx) = game(config);
        game.start(start);

        game.tick(Vec3::NEG_Z, start + Duration::from_secs(150));
        assert!(!game.is_day());
        assert_eq!(game.world().scene().lighting, Some(NIGHT_LIGHTING));

        game.tick(Vec3::NEG_Z, start + Duration::from_secs(300));
        assert!(game.is_day());
        assert_eq!(game.world().scene().lighting, Some(DAY_LIGHTING));

        let changes = rx
            .drain()
            .filter(|event| matches!(event, GameEvent::DayNightChanged { .. }))
            .count();
        assert_eq!(changes, 2);
    }

    #[test]
    fn block_limit_is_reported_as_event() {
        let start = Instant::now();
        let config = GameConfig {
            max_blocks: 332,
            ..GameConfig::default()
        };
        let (mut game, rx) = game(config);
        game.start(start);

        assert_eq!(game.place(Vec3::Z), None);
        assert_eq!(game.world().len(), 332);
        assert!(rx
            .drain()
            .any(|event| event == GameEvent::BlockLimitReached { limit: 332 }));
    }

    #[test]
    fn hud_reflects_state() {
        let (mut game, _rx) = game(GameConfig::default());
        game.cycle_slot(-1);
        let hud = game.hud();
        assert_eq!(hud.inventory, "Inventory: 332 blocks");
        assert_eq!(hud.feedback, "Selected Block Color: 10");
        assert_eq!(hud, game.hud());
    }
}
