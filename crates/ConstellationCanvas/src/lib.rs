//! # ConstellationCanvas
//!
//! `constellation_canvas` is a headless engine for an interactive "knowledge
//! constellation": concepts drawn as stars whose size and glow encode mastery,
//! linked by the relationships a learner discovers.
//!
//! It handles camera math, hit-testing, the click-driven connection protocol,
//! particle feedback and redraw scheduling, while delegating pixels to the host.
//!
//! ## Core Architecture
//! - **Store (`src/store.rs`)**: The injected data owner. The engine never keeps its own mastery copy.
//! - **View (`src/view.rs`)**: Handles coordinate transformation (Scene <-> Screen).
//! - **Interaction (`src/interaction.rs`)**: Pointer gestures and the connection state machine.
//! - **Painter (`src/painter.rs`)**: Turns the scene into `DrawCommand`s on a `Surface`.
//! - **Scheduler (`src/scheduler.rs`)**: Coalesces redraws into animation frames.

pub mod config;
pub mod error;
pub mod hit;
pub mod input;
pub mod interaction;
pub mod math;
pub mod model;
pub mod painter;
pub mod particles;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod view;

use glam::Vec2;
use std::collections::BTreeSet;

use input::{CursorIcon, PointerEvent};
use interaction::{ConnectionState, InteractionState};
use model::ConceptId;
use painter::{FrameState, Painter, Starfield};
use particles::{Particle, ParticleSystem};
use render::Surface;
use scheduler::{FrameHandle, FrameRequester, RenderScheduler};
use store::GraphStore;
use view::{Camera, View};

// Re-exports for convenience
pub use config::CanvasConfig;
pub use error::CanvasError;
pub use interaction::LogicEvent;
pub use store::InMemoryGraphStore;

/// Viewport assumed until the host calls [`Constellation::resize`].
const DEFAULT_VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

/// The main entry point for the library.
///
/// `Constellation` holds the transient state of the visualization (camera,
/// gesture, selection, particles) and talks to the data store only through the
/// [`GraphStore`] passed into each call. Tearing it down (or dropping it)
/// cancels any scheduled frame.
pub struct Constellation<R: FrameRequester> {
    config: CanvasConfig,
    view: View,
    interaction: InteractionState,
    particles: ParticleSystem,
    scheduler: RenderScheduler,
    highlights: BTreeSet<ConceptId>,
    starfield: Starfield,
    requester: R,
}

impl<R: FrameRequester> Constellation<R> {
    /// Creates a new engine. Fails only on a nonsensical config.
    pub fn new(config: CanvasConfig, requester: R) -> Result<Self, CanvasError> {
        config.validate()?;
        let bounds =
            math::Rect::new(Vec2::ZERO, DEFAULT_VIEWPORT).expand(DEFAULT_VIEWPORT.max_element());
        Ok(Self {
            starfield: Starfield::generate(config.background_seed, config.star_count, bounds),
            particles: ParticleSystem::new(config.particles.clone()),
            view: View::new(Camera::default(), DEFAULT_VIEWPORT),
            interaction: InteractionState::default(),
            scheduler: RenderScheduler::new(),
            highlights: BTreeSet::new(),
            config,
            requester,
        })
    }

    /// Makes particle spawn positions reproducible.
    pub fn with_particle_seed(mut self, seed: u64) -> Self {
        self.particles = ParticleSystem::with_seed(self.config.particles.clone(), seed);
        self
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn camera(&self) -> Camera {
        self.view.camera
    }

    pub fn connection_state(&self) -> &ConnectionState {
        &self.interaction.connection
    }

    pub fn hovered(&self) -> Option<&ConceptId> {
        self.interaction.hovered.as_ref()
    }

    pub fn cursor(&self) -> CursorIcon {
        self.interaction.cursor()
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    pub fn highlights(&self) -> &BTreeSet<ConceptId> {
        &self.highlights
    }

    pub fn needs_redraw(&self) -> bool {
        self.scheduler.needs_redraw()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.scheduler.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.scheduler.is_torn_down()
    }

    pub fn requester(&self) -> &R {
        &self.requester
    }

    pub fn requester_mut(&mut self) -> &mut R {
        &mut self.requester
    }

    /// Updates the surface size in device pixels (e.g., on window resize).
    pub fn resize(&mut self, size: Vec2) -> Result<(), CanvasError> {
        if !(size.is_finite() && size.x >= 0.0 && size.y >= 0.0) {
            return Err(CanvasError::InvalidViewport {
                width: size.x,
                height: size.y,
            });
        }
        self.view.viewport_size = size;
        self.invalidate();
        Ok(())
    }

    /// Processes one pointer event in arrival order.
    pub fn handle_pointer<S: GraphStore + ?Sized>(
        &mut self,
        event: &PointerEvent,
        store: &mut S,
    ) -> Vec<LogicEvent> {
        let mut events = Vec::new();
        if self.is_torn_down() {
            return events;
        }
        let redraw = interaction::handle_pointer(
            &mut self.interaction,
            &mut self.view,
            &self.config,
            event,
            store,
            &mut self.particles,
            &mut events,
        );
        if redraw || !self.particles.is_empty() {
            self.invalidate();
        }
        events
    }

    /// Turns the store's newly-discovered concepts into highlights with a
    /// particle burst each, then clears the store's set. Highlights of
    /// concepts the store no longer knows are dropped.
    ///
    /// Returns how many concepts were highlighted.
    pub fn sync_discoveries<S: GraphStore + ?Sized>(&mut self, store: &mut S) -> usize {
        if self.is_torn_down() {
            return 0;
        }
        let before = self.highlights.len();
        self.highlights.retain(|id| store.node(id).is_some());
        if self.highlights.len() != before {
            tracing::debug!(
                dropped = before - self.highlights.len(),
                "Dropped highlights of removed concepts"
            );
            self.invalidate();
        }

        let discovered = store.newly_discovered();
        if discovered.is_empty() {
            return 0;
        }

        let mut count = 0;
        for id in discovered {
            let Some(node) = store.node(&id).filter(|n| n.discovered) else {
                continue;
            };
            if let Some(position) = node.position {
                let color = self.config.style.domains.color(node.domain);
                self.particles
                    .spawn_burst(position, self.config.discovery_burst, color);
            }
            tracing::debug!(concept = %id, "Highlighting newly discovered concept");
            self.highlights.insert(id);
            count += 1;
        }
        store.reset_newly_discovered();
        self.invalidate();
        count
    }

    /// Highlights a concept without a burst.
    pub fn highlight(&mut self, id: ConceptId) {
        if self.highlights.insert(id) {
            self.invalidate();
        }
    }

    pub fn clear_highlights(&mut self) {
        if !self.highlights.is_empty() {
            self.highlights.clear();
            self.invalidate();
        }
    }

    /// Selects a discovered concept, as if it had been clicked from `Idle`.
    pub fn select<S: GraphStore + ?Sized>(
        &mut self,
        id: &ConceptId,
        store: &S,
    ) -> Vec<LogicEvent> {
        let valid = store.node(id).is_some_and(|n| n.discovered);
        self.enter(valid.then(|| ConnectionState::NodeSelected(id.clone())))
    }

    /// Makes a discovered concept the source of a pending connection.
    pub fn start_pending_connection<S: GraphStore + ?Sized>(
        &mut self,
        id: &ConceptId,
        store: &S,
    ) -> Vec<LogicEvent> {
        let valid = store.node(id).is_some_and(|n| n.discovered);
        self.enter(valid.then(|| ConnectionState::PendingConnection(id.clone())))
    }

    /// Drops a pending connection. Leaves a plain selection alone.
    pub fn cancel_pending_connection(&mut self) -> Vec<LogicEvent> {
        let pending = self.interaction.connection.pending().is_some();
        self.enter(pending.then_some(ConnectionState::Idle))
    }

    pub fn clear_selection(&mut self) -> Vec<LogicEvent> {
        self.enter(Some(ConnectionState::Idle))
    }

    fn enter(&mut self, next: Option<ConnectionState>) -> Vec<LogicEvent> {
        let mut events = Vec::new();
        if self.is_torn_down() {
            return events;
        }
        if let Some(next) = next
            && self.interaction.transition(next, &mut events)
        {
            self.invalidate();
        }
        events
    }

    /// Replaces the camera. Zoom is clamped into the configured range.
    pub fn set_camera(&mut self, camera: Camera) {
        self.view.camera = Camera {
            pan: camera.pan,
            zoom: camera.zoom.clamp(self.config.zoom_min, self.config.zoom_max),
        };
        self.invalidate();
    }

    pub fn reset_camera(&mut self) {
        self.view.reset();
        self.invalidate();
    }

    /// The host changed the store behind the engine's back.
    pub fn notify_data_changed(&mut self) {
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.scheduler.invalidate(&mut self.requester);
    }

    /// One animation tick.
    ///
    /// Advances particles, draws if anything changed and keeps ticking only
    /// while particles are alive. A missing `surface` skips drawing without
    /// losing the pending redraw. Returns whether a frame was drawn.
    pub fn on_animation_frame<S: GraphStore + ?Sized>(
        &mut self,
        handle: FrameHandle,
        store: &S,
        surface: Option<&mut dyn Surface>,
        time_s: f32,
    ) -> bool {
        if !self.scheduler.begin_frame(handle) {
            return false;
        }

        let before = self.particles.len();
        let moved = self.particles.tick();
        if moved || self.particles.len() != before {
            self.scheduler.mark_dirty();
        }

        let mut drew = false;
        if self.scheduler.needs_redraw() {
            match surface {
                Some(surface) => {
                    self.render(store, surface, time_s);
                    drew = true;
                }
                None => tracing::debug!("Drawing surface unavailable, skipping frame"),
            }
        }

        if !self.particles.is_empty() {
            self.scheduler.schedule(&mut self.requester);
        }
        drew
    }

    /// Draws the current scene immediately and clears the redraw flag.
    pub fn render<S: GraphStore + ?Sized>(
        &mut self,
        store: &S,
        surface: &mut dyn Surface,
        time_s: f32,
    ) {
        if self.is_torn_down() {
            return;
        }
        let frame = FrameState {
            interaction: &self.interaction,
            highlights: &self.highlights,
            particles: self.particles.particles(),
            starfield: &self.starfield,
            time_s,
        };
        Painter::draw_scene(&self.view, &self.config, store, &frame, surface);
        self.scheduler.finish_draw();
    }

    /// Cancels the scheduled frame and stops all animation. Idempotent.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.scheduler.teardown(&mut self.requester);
        self.particles.clear();
        self.highlights.clear();
        self.interaction = InteractionState::default();
        tracing::debug!("Constellation torn down");
    }
}

impl<R: FrameRequester> Drop for Constellation<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
