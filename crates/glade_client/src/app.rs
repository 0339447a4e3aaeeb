use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glade_core::events::{self, EventReceiver};
use glade_core::schedule::FixedTimestep;
use glade_shared::game::{Game, GameEvent};
use glam::Vec2;
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::camera::Camera;
use crate::input::{click_action, hotbar_slot, move_key, scroll_steps, ClickAction};
use crate::renderer::Renderer;
use crate::scene::RenderScene;
use crate::settings::{load_or_create_settings, GameSettings, SETTINGS_PATH};

const TICK_RATE: u32 = 60;
const MAX_TICKS_PER_FRAME: u32 = 5;

struct GladeApp {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    game: Option<Game<RenderScene>>,
    events: Option<EventReceiver<GameEvent>>,
    settings: GameSettings,
    camera: Camera,
    timestep: FixedTimestep,
    cursor_grabbed: bool,
    last_frame: Option<Instant>,
    fps_sample_start: Option<Instant>,
    fps_frame_count: u32,
    fps: f32,
}

impl GladeApp {
    fn new(settings: GameSettings) -> Self {
        let camera = Camera {
            fov: settings.fov.to_radians(),
            ..Camera::default()
        };
        Self {
            window: None,
            renderer: None,
            game: None,
            events: None,
            settings,
            camera,
            timestep: FixedTimestep::new(
                Duration::from_secs(1) / TICK_RATE,
                MAX_TICKS_PER_FRAME,
            ),
            cursor_grabbed: false,
            last_frame: None,
            fps_sample_start: None,
            fps_frame_count: 0,
            fps: 0.0,
        }
    }

    fn start_game(&mut self, now: Instant) -> bool {
        let seed = self.settings.world_seed.unwrap_or_else(rand::random);
        let (sender, receiver) = events::channel();
        let config = self.settings.game_config(seed);

        match Game::new(RenderScene::default(), &config, sender) {
            Ok(mut game) => {
                info!(seed, blocks = game.world().len(), "world ready");
                game.start(now);
                self.camera.position = game.player().position;
                self.game = Some(game);
                self.events = Some(receiver);
                true
            }
            Err(err) => {
                error!("failed to generate world: {err}");
                false
            }
        }
    }

    fn set_cursor_grab(&mut self, enabled: bool) {
        let Some(window) = self.window.as_ref() else {
            self.cursor_grabbed = false;
            return;
        };

        let grabbed = if enabled {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                .is_ok()
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            false
        };

        if !grabbed {
            if let Some(game) = self.game.as_mut() {
                game.release_all();
                let _ = game.input_mut().take_mouse_delta();
            }
        }

        window.set_cursor_visible(!grabbed);
        if grabbed != self.cursor_grabbed {
            debug!(locked = grabbed, "pointer lock changed");
        }
        self.cursor_grabbed = grabbed;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_crosshair_visible(grabbed);
        }
    }

    fn handle_key(&mut self, code: KeyCode, state: ElementState, now: Instant) {
        if code == KeyCode::Escape {
            if state.is_pressed() && self.cursor_grabbed {
                self.set_cursor_grab(false);
            }
            return;
        }

        let Some(game) = self.game.as_mut() else {
            return;
        };

        if let Some(key) = move_key(code) {
            match state {
                ElementState::Pressed => game.press(key),
                ElementState::Released => game.release(key),
            }
            return;
        }

        if !state.is_pressed() {
            return;
        }
        if code == KeyCode::Space {
            game.jump(now);
        } else if let Some(slot) = hotbar_slot(code) {
            game.select_slot(slot);
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let Some(action) = click_action(button, state, self.cursor_grabbed) else {
            return;
        };

        if action == ClickAction::GrabPointer {
            self.set_cursor_grab(true);
            return;
        }

        let Some(game) = self.game.as_mut() else {
            return;
        };
        match action {
            ClickAction::Break => {
                game.break_target(&self.camera.crosshair_ray());
            }
            ClickAction::Place => {
                game.place(self.camera.forward_direction());
            }
            ClickAction::GrabPointer => {}
        }
    }

    fn drain_game_events(&self) {
        let Some(receiver) = self.events.as_ref() else {
            return;
        };

        for event in receiver.drain() {
            match event {
                GameEvent::BlockPlaced { id, position, color } => {
                    debug!(?id, ?position, color = color.hex(), "block placed");
                }
                GameEvent::BlockBroken { id, position, burst } => {
                    debug!(?id, ?position, ?burst, "block broken");
                }
                GameEvent::DayNightChanged { is_day } => {
                    info!(is_day, "day/night changed");
                }
                GameEvent::BlockLimitReached { limit } => {
                    debug!(limit, "placement rejected at block limit");
                }
            }
        }
    }

    fn update_and_render(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let frame_time = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);

        let Some(game) = self.game.as_mut() else {
            return;
        };

        let steps = self.timestep.advance(frame_time);
        for _ in 0..steps {
            let delta = game.input_mut().take_mouse_delta();
            self.camera
                .update_look(delta, self.settings.mouse_sensitivity);
            game.tick(self.camera.forward_direction(), now);
        }
        self.camera.position = game.player().position;
        let hud = game.hud();

        self.fps_frame_count += 1;
        match self.fps_sample_start {
            Some(sample_start) => {
                let elapsed = (now - sample_start).as_secs_f32();
                if elapsed >= 1.0 {
                    self.fps = self.fps_frame_count as f32 / elapsed;
                    self.fps_frame_count = 0;
                    self.fps_sample_start = Some(now);
                }
            }
            None => {
                self.fps_sample_start = Some(now);
                self.fps_frame_count = 0;
            }
        }

        self.drain_game_events();

        let (Some(renderer), Some(window), Some(game)) = (
            self.renderer.as_mut(),
            self.window.as_ref(),
            self.game.as_mut(),
        ) else {
            return;
        };

        renderer.update_frame(&self.camera, game.world_mut().scene_mut());
        renderer.update_hud(&hud, self.settings.show_fps.then_some(self.fps));

        let size = window.inner_size();
        match renderer.render_frame() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                renderer.resize(size.width, size.height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Out of GPU memory; shutting down event loop");
                event_loop.exit();
            }
            Err(_) => {}
        }
    }
}

impl ApplicationHandler for GladeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes().with_title("Glade");
        match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                match Renderer::new(window.clone()) {
                    Ok(mut renderer) => {
                        let size = window.inner_size();
                        self.camera.set_aspect(size.width, size.height);
                        renderer.set_crosshair_visible(false);

                        info!("Window and renderer initialized");
                        self.window = Some(window);
                        self.renderer = Some(renderer);

                        let now = Instant::now();
                        if !self.start_game(now) {
                            event_loop.exit();
                            return;
                        }
                        self.last_frame = Some(now);
                        self.fps_sample_start = Some(now);
                        self.fps_frame_count = 0;
                        self.fps = 0.0;
                        self.timestep.reset();
                    }
                    Err(err) => {
                        error!("failed to initialize renderer: {err}");
                        event_loop.exit();
                    }
                }
            }
            Err(err) => {
                error!("failed to create window: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(|window| window.id()) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested; shutting down event loop");
                if let Some(game) = self.game.as_mut() {
                    game.stop();
                }
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.handle_key(code, event.state, Instant::now());
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = scroll_steps(delta);
                if steps != 0 {
                    if let Some(game) = self.game.as_mut() {
                        game.cycle_slot(steps);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.set_cursor_grab(false);
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                self.camera.set_aspect(size.width, size.height);
                info!("Window resized to {}x{}", size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.update_and_render(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if !self.cursor_grabbed {
            return;
        }

        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(game) = self.game.as_mut() {
                game.input_mut()
                    .add_mouse_delta(Vec2::new(delta.0 as f32, delta.1 as f32));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

pub fn run() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();

    let event_loop = match EventLoop::new() {
        Ok(loop_handle) => loop_handle,
        Err(err) => {
            eprintln!("Failed to create event loop: {err}");
            return;
        }
    };

    let settings = load_or_create_settings(Path::new(SETTINGS_PATH));
    let mut app = GladeApp::new(settings);
    if let Err(err) = event_loop.run_app(&mut app) {
        eprintln!("Event loop exited with error: {err}");
    }
}
