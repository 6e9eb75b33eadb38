use glam::Vec2;

use crate::config::CanvasConfig;
use crate::hit;
use crate::input::{CursorIcon, PointerButton, PointerEvent, PointerKind};
use crate::math;
use crate::model::{ConceptConnection, ConceptId};
use crate::particles::ParticleSystem;
use crate::store::{ConnectOutcome, GraphStore};
use crate::view::View;

/// Advisory notifications emitted to the host. Nothing in the engine depends
/// on them being consumed.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicEvent {
    /// The hovered node changed. `None` means the pointer left every node.
    NodeHovered(Option<ConceptId>),
    NodeSelected(ConceptId),
    SelectionCleared,
    /// The node was clicked a second time and is now the source of a link.
    ConnectionPending(ConceptId),
    /// A new edge was formed. `strength` is the value at creation time.
    ConnectionCreated {
        source: ConceptId,
        target: ConceptId,
        strength: f32,
    },
}

/// Progress of the click-driven connection protocol.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    NodeSelected(ConceptId),
    PendingConnection(ConceptId),
}

/// Request to link two nodes, produced by a click in `PendingConnection`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRequest {
    pub from: ConceptId,
    pub to: ConceptId,
}

/// Result of feeding one resolved click into [`ConnectionState::on_click`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickOutcome {
    pub next: ConnectionState,
    pub link: Option<LinkRequest>,
}

impl ConnectionState {
    /// The transition table. `hit` is the node under the click, if any.
    pub fn on_click(&self, hit: Option<&ConceptId>) -> ClickOutcome {
        let (next, link) = match (self, hit) {
            (ConnectionState::Idle, Some(n)) => (ConnectionState::NodeSelected(n.clone()), None),
            (ConnectionState::Idle, None) => (ConnectionState::Idle, None),
            (ConnectionState::NodeSelected(a), Some(n)) if a == n => {
                (ConnectionState::PendingConnection(a.clone()), None)
            }
            (ConnectionState::NodeSelected(_), Some(n)) => {
                (ConnectionState::NodeSelected(n.clone()), None)
            }
            (ConnectionState::NodeSelected(_), None) => (ConnectionState::Idle, None),
            (ConnectionState::PendingConnection(a), Some(n)) if a == n => {
                (ConnectionState::Idle, None)
            }
            (ConnectionState::PendingConnection(a), Some(n)) => (
                ConnectionState::Idle,
                Some(LinkRequest {
                    from: a.clone(),
                    to: n.clone(),
                }),
            ),
            (ConnectionState::PendingConnection(_), None) => (ConnectionState::Idle, None),
        };
        ClickOutcome { next, link }
    }

    /// The node shown as selected: the selection itself or the pending source.
    pub fn focused(&self) -> Option<&ConceptId> {
        match self {
            ConnectionState::Idle => None,
            ConnectionState::NodeSelected(id) | ConnectionState::PendingConnection(id) => Some(id),
        }
    }

    pub fn selected(&self) -> Option<&ConceptId> {
        match self {
            ConnectionState::NodeSelected(id) => Some(id),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&ConceptId> {
        match self {
            ConnectionState::PendingConnection(id) => Some(id),
            _ => None,
        }
    }
}

/// Tracks a single pointer gesture from down to up.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PointerGesture {
    #[default]
    Released,
    /// A button is down but the pointer has not travelled far enough to pan.
    Pressed {
        button: PointerButton,
        /// Screen-space position at pointer-down.
        start: Vec2,
        started_at_ms: u64,
    },
    /// The canvas is being dragged.
    Panning {
        button: PointerButton,
        /// Last seen screen-space position.
        last: Vec2,
    },
}

impl PointerGesture {
    fn button(&self) -> Option<PointerButton> {
        match self {
            PointerGesture::Released => None,
            PointerGesture::Pressed { button, .. } | PointerGesture::Panning { button, .. } => {
                Some(*button)
            }
        }
    }
}

/// All transient interaction state owned by the engine.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
    pub connection: ConnectionState,
    pub gesture: PointerGesture,
    pub hovered: Option<ConceptId>,
    /// Last known pointer position in Scene Space. Drives the link preview.
    pub pointer_scene: Option<Vec2>,
}

impl InteractionState {
    pub fn cursor(&self) -> CursorIcon {
        match (&self.gesture, &self.hovered) {
            (PointerGesture::Panning { .. }, _) => CursorIcon::Grabbing,
            (_, Some(_)) => CursorIcon::Pointer,
            (_, None) => CursorIcon::Grab,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, PointerGesture::Panning { .. })
    }

    /// Moves to `next`, emitting the notification for the state entered.
    ///
    /// Returns whether the state changed.
    pub fn transition(&mut self, next: ConnectionState, events: &mut Vec<LogicEvent>) -> bool {
        if next == self.connection {
            return false;
        }
        match &next {
            ConnectionState::Idle => events.push(LogicEvent::SelectionCleared),
            ConnectionState::NodeSelected(id) => events.push(LogicEvent::NodeSelected(id.clone())),
            ConnectionState::PendingConnection(id) => {
                events.push(LogicEvent::ConnectionPending(id.clone()))
            }
        }
        tracing::debug!(from = ?self.connection, to = ?next, "Connection state transition");
        self.connection = next;
        true
    }

    /// Updates the hovered node, emitting `NodeHovered` only on change.
    fn set_hovered(&mut self, hovered: Option<ConceptId>, events: &mut Vec<LogicEvent>) -> bool {
        if hovered == self.hovered {
            return false;
        }
        self.hovered = hovered.clone();
        events.push(LogicEvent::NodeHovered(hovered));
        true
    }
}

/// Handles one pointer event and updates interaction/view state.
///
/// This is the central state machine of the engine. Drag-vs-click ambiguity is
/// resolved here; a resolved click is dispatched exactly once into
/// [`ConnectionState::on_click`] and any resulting link is executed against the store.
///
/// Returns whether the scene needs a redraw.
#[allow(clippy::too_many_arguments)]
pub fn handle_pointer<S: GraphStore + ?Sized>(
    state: &mut InteractionState,
    view: &mut View,
    config: &CanvasConfig,
    event: &PointerEvent,
    store: &mut S,
    particles: &mut ParticleSystem,
    events: &mut Vec<LogicEvent>,
) -> bool {
    let pos = event.position;
    match event.kind {
        PointerKind::Wheel { delta_y } => {
            let factor = 1.0 - delta_y * config.zoom_speed;
            view.zoom_by(factor, config.zoom_min, config.zoom_max)
        }
        PointerKind::Down => handle_down(state, view, event),
        PointerKind::Move => handle_move(state, view, config, pos, &*store, events),
        PointerKind::Up => handle_up(state, view, config, event, store, particles, events),
        PointerKind::Leave => {
            state.gesture = PointerGesture::Released;
            state.pointer_scene = None;
            state.set_hovered(None, events);
            true
        }
    }
}

fn handle_down(state: &mut InteractionState, view: &View, event: &PointerEvent) -> bool {
    if state.gesture != PointerGesture::Released {
        // Second button while a gesture is in flight.
        return false;
    }
    state.pointer_scene = Some(view.screen_to_scene(event.position));
    if event.button.always_pans() {
        state.gesture = PointerGesture::Panning {
            button: event.button,
            last: event.position,
        };
        return true;
    }
    state.gesture = PointerGesture::Pressed {
        button: event.button,
        start: event.position,
        started_at_ms: event.time_ms,
    };
    false
}

fn handle_move<S: GraphStore + ?Sized>(
    state: &mut InteractionState,
    view: &mut View,
    config: &CanvasConfig,
    pos: Vec2,
    store: &S,
    events: &mut Vec<LogicEvent>,
) -> bool {
    let mut redraw = false;
    match state.gesture {
        PointerGesture::Pressed { button, start, .. } => {
            if pos.distance(start) >= config.drag_threshold {
                // Apply the whole travel so the scene does not jump behind the pointer.
                view.pan_by(pos - start);
                state.gesture = PointerGesture::Panning { button, last: pos };
                redraw = true;
            }
        }
        PointerGesture::Panning { button, last } => {
            view.pan_by(pos - last);
            state.gesture = PointerGesture::Panning { button, last: pos };
            redraw = true;
        }
        PointerGesture::Released => {}
    }

    let scene = view.screen_to_scene(pos);
    state.pointer_scene = Some(scene);
    if state.connection.pending().is_some() {
        redraw = true;
    }

    if !state.is_panning() {
        let hovered = hit::find_node_at(scene, store.nodes(), config).cloned();
        redraw |= state.set_hovered(hovered, events);
    }
    redraw
}

#[allow(clippy::too_many_arguments)]
fn handle_up<S: GraphStore + ?Sized>(
    state: &mut InteractionState,
    view: &mut View,
    config: &CanvasConfig,
    event: &PointerEvent,
    store: &mut S,
    particles: &mut ParticleSystem,
    events: &mut Vec<LogicEvent>,
) -> bool {
    if state.gesture.button() != Some(event.button) {
        return false;
    }
    let gesture = std::mem::take(&mut state.gesture);

    let mut redraw = match gesture {
        PointerGesture::Pressed { start, .. }
            if event.position.distance(start) < config.drag_threshold =>
        {
            let scene = view.screen_to_scene(event.position);
            resolve_click(state, config, scene, store, particles, events)
        }
        PointerGesture::Pressed { start, .. } => {
            // The drag arrived without intermediate moves; apply it whole.
            tracing::trace!("Released beyond the drag threshold; panning");
            view.pan_by(event.position - start);
            true
        }
        // Cursor flips back from grabbing.
        PointerGesture::Panning { .. } => true,
        PointerGesture::Released => false,
    };

    let scene = view.screen_to_scene(event.position);
    state.pointer_scene = Some(scene);
    let hovered = hit::find_node_at(scene, store.nodes(), config).cloned();
    redraw |= state.set_hovered(hovered, events);
    redraw
}

/// Feeds a resolved click at `scene` into the connection protocol.
fn resolve_click<S: GraphStore + ?Sized>(
    state: &mut InteractionState,
    config: &CanvasConfig,
    scene: Vec2,
    store: &mut S,
    particles: &mut ParticleSystem,
    events: &mut Vec<LogicEvent>,
) -> bool {
    if let Some(source) = state.connection.pending()
        && !store.node(source).is_some_and(|n| n.discovered)
    {
        tracing::debug!(source = %source, "Abandoning pending connection to a concept that is gone");
        return state.transition(ConnectionState::Idle, events);
    }

    let target = hit::find_node_at(scene, store.nodes(), config).cloned();
    let outcome = state.connection.on_click(target.as_ref());
    let mut redraw = state.transition(outcome.next, events);

    if let Some(link) = outcome.link
        && let Some(connection) = execute_link(config, &link, store, particles)
    {
        events.push(LogicEvent::ConnectionCreated {
            source: connection.source,
            target: connection.target,
            strength: connection.strength,
        });
        redraw = true;
    }
    redraw
}

/// Creates the edge, rewards both endpoints and spawns feedback at the midpoint.
///
/// Rejected attempts (duplicate, self-loop, undiscovered or unknown endpoint)
/// are no-ops and return `None`.
pub fn execute_link<S: GraphStore + ?Sized>(
    config: &CanvasConfig,
    link: &LinkRequest,
    store: &mut S,
    particles: &mut ParticleSystem,
) -> Option<ConceptConnection> {
    let connection = match store.create_connection(&link.from, &link.to) {
        ConnectOutcome::Created(connection) => connection,
        rejected => {
            tracing::debug!(from = %link.from, to = %link.to, outcome = ?rejected, "Connection attempt rejected");
            return None;
        }
    };

    store.update_mastery(&link.from, config.connection_mastery_bonus);
    store.update_mastery(&link.to, config.connection_mastery_bonus);

    let endpoints = store.node(&link.from).zip(store.node(&link.to));
    if let Some((a, b)) = endpoints
        && let (Some(pa), Some(pb)) = (a.position, b.position)
    {
        let palette = &config.style.domains;
        let color = math::mix(palette.color(a.domain), palette.color(b.domain), 0.5);
        particles.spawn_burst(math::midpoint(pa, pb), config.connection_burst, color);
    }

    tracing::info!(from = %link.from, to = %link.to, strength = connection.strength, "Connection created");
    Some(connection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ConceptId {
        ConceptId::new(s)
    }

    #[test]
    fn test_transition_table() {
        let a = id("a");
        let b = id("b");
        let idle = ConnectionState::Idle;
        let selected = ConnectionState::NodeSelected(a.clone());
        let pending = ConnectionState::PendingConnection(a.clone());

        assert_eq!(idle.on_click(Some(&a)).next, selected);
        assert_eq!(idle.on_click(None).next, idle);
        assert_eq!(selected.on_click(Some(&a)).next, pending);
        assert_eq!(
            selected.on_click(Some(&b)).next,
            ConnectionState::NodeSelected(b.clone())
        );
        assert_eq!(selected.on_click(None).next, idle);
        assert_eq!(pending.on_click(Some(&a)).next, idle);
        assert_eq!(pending.on_click(None).next, idle);

        let linked = pending.on_click(Some(&b));
        assert_eq!(linked.next, idle);
        assert_eq!(linked.link, Some(LinkRequest { from: a, to: b }));
    }

    #[test]
    fn test_cursor_affordance() {
        let mut state = InteractionState::default();
        assert_eq!(state.cursor(), CursorIcon::Grab);
        state.hovered = Some(id("a"));
        assert_eq!(state.cursor(), CursorIcon::Pointer);
        state.gesture = PointerGesture::Panning {
            button: PointerButton::Primary,
            last: Vec2::ZERO,
        };
        assert_eq!(state.cursor(), CursorIcon::Grabbing);
    }
}
