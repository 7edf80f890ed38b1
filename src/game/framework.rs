//! # Framework
//!
//! Owns the renderer, content, entities and input, and drives the fixed-step frame loop.

use super::animator::Animator;
use super::entity::{Entity, EntityHandler};
use crate::config::FrameworkConfig;
use crate::content::{ContentHandler, LoadReport};
use crate::input::InputState;
use crate::rendering::{FlushStats, Presenter, Renderer};
use crate::PixelFwResult;
use macroquad::prelude::next_frame;

/// What entity hooks can reach during a frame.
pub struct FrameContext<'a> {
    pub renderer: &'a mut Renderer,
    pub content: &'a ContentHandler,
    pub input: &'a InputState,
    pub config: &'a FrameworkConfig,
}

/// A game driven by [`Framework`].
///
/// `on_load` queues assets, `on_start` runs once after every queued asset has finished
/// loading, then `on_update` and `on_draw` run once per frame in that order.
pub trait Game<E: Entity> {
    fn on_load(&mut self, _content: &mut ContentHandler) -> PixelFwResult<()> {
        Ok(())
    }

    fn on_start(&mut self, _fw: &mut Framework<E>) -> PixelFwResult<()> {
        Ok(())
    }

    fn on_update(&mut self, _fw: &mut Framework<E>, _dt: f32) -> PixelFwResult<()> {
        Ok(())
    }

    fn on_draw(&mut self, _fw: &mut Framework<E>) -> PixelFwResult<()> {
        Ok(())
    }

    /// Ends [`Framework::run`] when true.
    fn is_finished(&self) -> bool {
        false
    }
}

/// The framework instance.
pub struct Framework<E: Entity> {
    pub renderer: Renderer,
    pub content: ContentHandler,
    pub entities: EntityHandler<E>,
    pub input: InputState,
    pub config: FrameworkConfig,
    frame_count: u64,
}

impl<E: Entity> Framework<E> {
    /// Validates `config` and builds every subsystem from it.
    pub fn new(config: FrameworkConfig, presenter: Box<dyn Presenter>) -> PixelFwResult<Self> {
        config.validate()?;
        log::info!(
            "Starting framework '{}' at {}x{} (pixel size {})",
            config.title,
            config.width,
            config.height,
            config.pixel_size
        );

        Ok(Self {
            renderer: Renderer::from_config(&config, presenter),
            content: ContentHandler::with_base_dir(config.asset_dir.clone()),
            entities: EntityHandler::new(),
            input: InputState::new(),
            config,
            frame_count: 0,
        })
    }

    /// Frames stepped so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Borrows the context entity hooks receive.
    pub fn context(&mut self) -> FrameContext<'_> {
        FrameContext {
            renderer: &mut self.renderer,
            content: &self.content,
            input: &self.input,
            config: &self.config,
        }
    }

    fn split(&mut self) -> (&mut EntityHandler<E>, FrameContext<'_>) {
        (
            &mut self.entities,
            FrameContext {
                renderer: &mut self.renderer,
                content: &self.content,
                input: &self.input,
                config: &self.config,
            },
        )
    }

    pub fn create_animator(&self) -> Animator {
        Animator::new()
    }

    pub fn update_entities(&mut self, dt: f32) {
        let (entities, mut ctx) = self.split();
        entities.update(&mut ctx, dt);
    }

    /// Draws created entities, optionally only those tagged `tag`.
    pub fn render_entities(&mut self, tag: Option<&str>) {
        let (entities, mut ctx) = self.split();
        entities.render(&mut ctx, tag);
    }

    /// Flushes the renderer with the configured sort mode.
    pub fn flush(&mut self) -> FlushStats {
        self.renderer.flush(self.config.sort)
    }

    /// Runs `on_load`, waits for every queued asset, then runs `on_start`.
    pub fn load<G: Game<E>>(&mut self, game: &mut G) -> PixelFwResult<LoadReport> {
        game.on_load(&mut self.content)?;
        let report = self.content.load_all_blocking()?;
        game.on_start(self)?;
        Ok(report)
    }

    /// Advances one frame by the fixed time step.
    ///
    /// There is no catch-up: a slow frame still advances exactly one step.
    pub fn step<G: Game<E>>(&mut self, game: &mut G) -> PixelFwResult<()> {
        let dt = self.config.time_step;
        game.on_update(self, dt)?;
        self.update_entities(dt);
        game.on_draw(self)?;
        self.input.end_frame();
        self.frame_count += 1;
        Ok(())
    }

    /// Loads the game and runs the macroquad frame loop until the game finishes.
    pub async fn run<G: Game<E>>(mut self, mut game: G) -> PixelFwResult<()> {
        let report = self.load(&mut game)?;
        log::info!(
            "Entering main loop ({} of {} assets loaded)",
            report.loaded,
            report.total()
        );

        while !game.is_finished() {
            let origin = self.renderer.camera().origin();
            self.input.poll_macroquad(self.renderer.pixel_size(), origin);
            self.step(&mut game)?;
            next_frame().await;
        }

        log::info!("Game finished after {} frames", self.frame_count);
        Ok(())
    }
}
