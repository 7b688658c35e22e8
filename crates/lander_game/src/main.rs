//! Lunar lander: steer a falling lander onto a good platform.
//!
//! winit drives the event loop through `ApplicationHandler`. Everything happens
//! in `RedrawRequested` on the main thread:
//!
//!   1. `begin_frame()` measures the wall-clock delta and feeds the accumulator
//!   2. `while should_step()` advances the world in fixed slices, stopping at
//!      the first platform contact
//!   3. the landing (if any) is resolved and the platform's texture swapped
//!   4. player, platforms and decorations are drawn and presented
//!
//! After a landing the final frame lingers briefly, then the app exits.

mod collision;
mod config;
mod entity;
mod error;
#[cfg(test)]
mod replay;
mod world;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use collision::{GamePhase, Landing};
use config::{load_startup_config, GameConfig, DEFAULT_CONFIG_PATH};
use error::GameError;
use lander_core::input::{InputState, Key};
use lander_core::time::TimeState;
use lander_render::{Camera2D, GpuContext, SpritePipeline, SpriteRenderer, TextureRegistry};
use world::{LevelTextures, World};

const STATS_INTERVAL_FRAMES: u64 = 300;

/// Counts frames the surface could not present.
#[derive(Debug, Default)]
struct PresentStats {
    skipped: u64,
    streak: u64,
}

impl PresentStats {
    /// Record one frame. Returns true on the first skip after a presented frame.
    fn record(&mut self, presented: bool) -> bool {
        if presented {
            self.streak = 0;
            return false;
        }
        self.skipped += 1;
        self.streak += 1;
        self.streak == 1
    }
}

/// Everything that exists once the window is up. Built in `resumed`.
struct GameContext {
    window: Arc<Window>,
    gpu: GpuContext,
    pipeline: SpritePipeline,
    renderer: SpriteRenderer,
    camera: Camera2D,
    textures: TextureRegistry,
    level_textures: LevelTextures,
    time: TimeState,
    input: InputState,
    world: World,
    config: GameConfig,
    /// Set when the round ends; drives the linger-then-exit.
    outcome_at: Option<Instant>,
    present: PresentStats,
}

impl GameContext {
    fn new(event_loop: &ActiveEventLoop, config: GameConfig) -> Result<Self, GameError> {
        let window = lander_platform::window::create_window(event_loop, &config.window)?;
        log::info!(
            "Window created: {}x{}",
            config.window.width,
            config.window.height
        );

        let gpu = GpuContext::new(window.clone())?;
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let camera = Camera2D::new(config.camera.half_width, config.camera.half_height);
        let renderer = SpriteRenderer::new(&gpu.device, &pipeline, &camera);

        let mut textures = TextureRegistry::new();
        let mut load = |path: &Path| textures.load(&gpu.device, &gpu.queue, &pipeline, path);
        let level_textures = LevelTextures {
            sprite_sheet: load(config.assets.sprite_sheet.as_path())?,
            good_platform: load(config.assets.good_platform.as_path())?,
            bad_platform: load(config.assets.bad_platform.as_path())?,
            decorations: config
                .decorations
                .iter()
                .map(|decoration| load(decoration.texture.as_path()))
                .collect::<Result<Vec<_>, _>>()?,
        };
        log::info!("Loaded {} textures", textures.texture_count());

        let world = World::new(&config, &level_textures)?;

        let mut time = TimeState::with_fixed_dt(config.timing.fixed_dt);
        time.slow_frame_dt = config.timing.slow_frame_dt;

        Ok(Self {
            window,
            gpu,
            pipeline,
            renderer,
            camera,
            textures,
            level_textures,
            time,
            input: InputState::new(),
            world,
            config,
            outcome_at: None,
            present: PresentStats::default(),
        })
    }

    fn restart(&mut self) {
        match World::new(&self.config, &self.level_textures) {
            Ok(world) => {
                self.world = world;
                self.outcome_at = None;
                self.time.reset();
                log::info!("Level restarted");
            }
            Err(err) => log::error!("Restart failed: {}", err),
        }
    }

    /// Show the outcome image on the platform that ended the round. The image
    /// is only loaded the first time it is needed.
    fn show_outcome(&mut self, landing: Landing) {
        let path = match landing.phase {
            GamePhase::Won => &self.config.assets.win,
            GamePhase::Lost => &self.config.assets.lose,
            GamePhase::Running => return,
        };
        match self
            .textures
            .load(&self.gpu.device, &self.gpu.queue, &self.pipeline, path)
        {
            Ok(id) => self.world.set_platform_texture(landing.platform, id),
            Err(err) => log::error!("Keeping platform texture: {}", err),
        }
    }

    /// One rendered frame. Returns false when the app should exit.
    fn frame(&mut self) -> bool {
        if self.input.is_just_pressed(Key::Escape) || self.input.is_just_pressed(Key::Q) {
            log::info!("Quit requested");
            return false;
        }
        if self.input.is_just_pressed(Key::R) {
            self.restart();
        }

        let move_x = self.input.axis(Key::Left, Key::Right);
        let dt = self.time.fixed_dt as f32;

        self.time.begin_frame();
        while self.time.should_step() {
            if self.world.phase().is_terminal() {
                continue;
            }
            self.world.apply_input(move_x);
            if self.world.step(dt) {
                break;
            }
        }
        self.time.end_frame();

        if let Some(landing) = self.world.resolve() {
            log::info!(
                "Landed on platform {} ({:?}): {}",
                landing.platform,
                landing.kind,
                landing.phase
            );
            self.show_outcome(landing);
            self.outcome_at = Some(Instant::now());
        }

        self.renderer.update_camera(&self.gpu.queue, &self.camera);
        let quads = self.world.quads();
        let [r, g, b, a] = self.config.camera.clear_color;
        let presented = self.renderer.render(
            &self.gpu,
            &self.pipeline,
            &self.textures,
            &quads,
            wgpu::Color { r, g, b, a },
        );
        if self.present.record(presented) {
            log::warn!("Frame {} not presented: no surface texture", self.time.frame_count);
        }

        if self.time.frame_count % STATS_INTERVAL_FRAMES == 0 {
            log::debug!(
                "fps {:.1} ({:.2} ms), steps {} total, {} skipped, phase {}, landing {:?}",
                self.time.smoothed_fps,
                self.time.smoothed_frame_time_ms,
                self.time.fixed_step_count,
                self.present.skipped,
                self.world.phase(),
                self.world.landing().map(|landing| landing.platform)
            );
        }
        self.input.end_frame();

        match self.outcome_at {
            Some(at) => at.elapsed().as_secs_f64() < self.config.timing.outcome_linger_secs,
            None => true,
        }
    }
}

struct App {
    config: GameConfig,
    ctx: Option<GameContext>,
    failed: bool,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            ctx: None,
            failed: false,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ctx.is_some() {
            return;
        }
        match GameContext::new(event_loop, self.config.clone()) {
            Ok(ctx) => self.ctx = Some(ctx),
            Err(err) => {
                log::error!("Startup failed: {}", err);
                self.failed = true;
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ctx) = &self.ctx {
            ctx.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    ctx.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => ctx.input.release_all(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => ctx.input.key_down(key),
                            ElementState::Released => ctx.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if ctx.gpu.size.0 == 0 || ctx.gpu.size.1 == 0 {
                    return;
                }
                if !ctx.frame() {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

fn run() -> Result<bool, GameError> {
    let requested = GameConfig::env_path();
    let config = load_startup_config(requested.as_deref(), Path::new(DEFAULT_CONFIG_PATH))?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(!app.failed)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Lunar lander starting...");

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
