use constellation_canvas::{
    CanvasConfig, Constellation, InMemoryGraphStore, LogicEvent,
    input::{CursorIcon, PointerButton, PointerEvent},
    interaction::ConnectionState,
    model::{ConceptId, ConceptNode, Domain},
    scheduler::ManualFrameRequester,
    store::GraphStore,
};
use glam::Vec2;

const A: Vec2 = Vec2::new(100.0, 100.0);
const B: Vec2 = Vec2::new(300.0, 100.0);
const EMPTY: Vec2 = Vec2::new(600.0, 450.0);

fn id(s: &str) -> ConceptId {
    ConceptId::new(s)
}

fn create_test_graph() -> InMemoryGraphStore {
    InMemoryGraphStore::with_nodes([
        ConceptNode::new("a", "Photosynthesis", Domain::Science)
            .with_mastery(40)
            .at(A)
            .discovered(),
        ConceptNode::new("b", "Chlorophyll", Domain::Science)
            .with_mastery(60)
            .at(B)
            .discovered(),
        ConceptNode::new("c", "Fractals", Domain::Mathematics)
            .with_mastery(10)
            .at(Vec2::new(200.0, 300.0))
            .discovered(),
    ])
}

fn create_canvas() -> Constellation<ManualFrameRequester> {
    Constellation::new(CanvasConfig::default(), ManualFrameRequester::new())
        .unwrap()
        .with_particle_seed(7)
}

fn click(
    canvas: &mut Constellation<ManualFrameRequester>,
    graph: &mut InMemoryGraphStore,
    pos: Vec2,
) -> Vec<LogicEvent> {
    let mut events = canvas.handle_pointer(&PointerEvent::down(pos), graph);
    events.extend(canvas.handle_pointer(&PointerEvent::up(pos), graph));
    events
}

#[test]
fn test_click_click_click_creates_connection() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();

    click(&mut canvas, &mut graph, A);
    assert_eq!(
        *canvas.connection_state(),
        ConnectionState::NodeSelected(id("a"))
    );

    let events = click(&mut canvas, &mut graph, A);
    assert_eq!(
        *canvas.connection_state(),
        ConnectionState::PendingConnection(id("a"))
    );
    assert!(events.contains(&LogicEvent::ConnectionPending(id("a"))));

    let events = click(&mut canvas, &mut graph, B);
    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
    assert!(events.contains(&LogicEvent::ConnectionCreated {
        source: id("a"),
        target: id("b"),
        strength: 50.0,
    }));

    assert_eq!(graph.connections().len(), 1);
    assert!(graph.are_connected(&id("a"), &id("b")));
    assert_eq!(graph.node(&id("a")).unwrap().mastery, 45);
    assert_eq!(graph.node(&id("b")).unwrap().mastery, 65);
    // Strength follows the bumped masteries.
    assert_eq!(graph.connections()[0].strength, 55.0);
    assert_eq!(canvas.particles().len(), 20);
}

#[test]
fn test_existing_connection_is_not_duplicated() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();
    graph.create_connection(&id("a"), &id("b"));
    assert_eq!(graph.connections().len(), 1);

    click(&mut canvas, &mut graph, A);
    click(&mut canvas, &mut graph, A);
    let events = click(&mut canvas, &mut graph, B);

    assert_eq!(graph.connections().len(), 1);
    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, LogicEvent::ConnectionCreated { .. }))
    );
    assert_eq!(graph.node(&id("a")).unwrap().mastery, 40);
    assert!(canvas.particles().is_empty());
}

#[test]
fn test_drag_over_node_does_not_select() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();

    canvas.handle_pointer(&PointerEvent::down(A), &mut graph);
    canvas.handle_pointer(&PointerEvent::moved(A + Vec2::new(20.0, 0.0)), &mut graph);
    assert_eq!(canvas.cursor(), CursorIcon::Grabbing);
    canvas.handle_pointer(&PointerEvent::moved(A + Vec2::new(50.0, 0.0)), &mut graph);
    let events = canvas.handle_pointer(&PointerEvent::up(A + Vec2::new(50.0, 0.0)), &mut graph);

    // The pointer is still over node A in scene space, yet nothing is selected.
    assert_eq!(canvas.hovered(), Some(&id("a")));
    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, LogicEvent::NodeSelected(_)))
    );
    assert_eq!(canvas.camera().pan, Vec2::new(50.0, 0.0));

    // A drag delivered as down then up, with the moves coalesced away.
    let mut canvas = create_canvas();
    canvas.handle_pointer(&PointerEvent::down(A), &mut graph);
    let events = canvas.handle_pointer(&PointerEvent::up(A + Vec2::new(50.0, 0.0)), &mut graph);
    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, LogicEvent::NodeSelected(_)))
    );
    assert_eq!(canvas.camera().pan, Vec2::new(50.0, 0.0));
    assert_eq!(canvas.hovered(), Some(&id("a")));
    assert!(canvas.needs_redraw());
}

#[test]
fn test_drag_from_empty_space_ending_on_node_position() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();
    let start = B - Vec2::new(50.0, 0.0);

    canvas.handle_pointer(&PointerEvent::down(start), &mut graph);
    canvas.handle_pointer(&PointerEvent::moved(B), &mut graph);
    canvas.handle_pointer(&PointerEvent::up(B), &mut graph);

    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
    assert_eq!(canvas.camera().pan, Vec2::new(50.0, 0.0));
}

#[test]
fn test_small_jitter_still_counts_as_click() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();

    canvas.handle_pointer(&PointerEvent::down(A), &mut graph);
    canvas.handle_pointer(&PointerEvent::moved(A + Vec2::new(3.0, 0.0)), &mut graph);
    canvas.handle_pointer(&PointerEvent::up(A + Vec2::new(3.0, 0.0)), &mut graph);

    assert_eq!(
        *canvas.connection_state(),
        ConnectionState::NodeSelected(id("a"))
    );
    assert_eq!(canvas.camera().pan, Vec2::ZERO);
}

#[test]
fn test_secondary_button_always_pans() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();

    let down = PointerEvent::down(A).with_button(PointerButton::Secondary);
    canvas.handle_pointer(&down, &mut graph);
    assert_eq!(canvas.cursor(), CursorIcon::Grabbing);

    canvas.handle_pointer(
        &PointerEvent::moved(A + Vec2::new(2.0, 1.0)),
        &mut graph,
    );
    let up = PointerEvent::up(A + Vec2::new(2.0, 1.0)).with_button(PointerButton::Secondary);
    canvas.handle_pointer(&up, &mut graph);

    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
    assert_eq!(canvas.camera().pan, Vec2::new(2.0, 1.0));
}

#[test]
fn test_hover_reported_only_on_change() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();

    let first = canvas.handle_pointer(&PointerEvent::moved(A), &mut graph);
    let second = canvas.handle_pointer(&PointerEvent::moved(A + Vec2::new(1.0, 1.0)), &mut graph);
    let off = canvas.handle_pointer(&PointerEvent::moved(EMPTY), &mut graph);

    assert_eq!(first, vec![LogicEvent::NodeHovered(Some(id("a")))]);
    assert!(second.is_empty());
    assert_eq!(off, vec![LogicEvent::NodeHovered(None)]);
    assert_eq!(canvas.cursor(), CursorIcon::Grab);
}

#[test]
fn test_cursor_is_pointer_over_node() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();
    canvas.handle_pointer(&PointerEvent::moved(B), &mut graph);
    assert_eq!(canvas.cursor(), CursorIcon::Pointer);
}

#[test]
fn test_clicking_pending_source_always_cancels() {
    let mut graph = create_test_graph();

    // Reach Pending(a) through several different histories.
    let histories: Vec<Vec<Vec2>> = vec![
        vec![A, A],
        vec![B, A, A],
        vec![EMPTY, A, B, A, A],
        vec![A, A, A, A, A],
    ];
    for history in histories {
        let mut canvas = create_canvas();
        for pos in history {
            click(&mut canvas, &mut graph, pos);
        }
        assert_eq!(
            *canvas.connection_state(),
            ConnectionState::PendingConnection(id("a"))
        );
        let events = click(&mut canvas, &mut graph, A);
        assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
        assert!(events.contains(&LogicEvent::SelectionCleared));
    }
    assert!(graph.connections().is_empty());
}

#[test]
fn test_click_empty_space_deselects_and_cancels() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();

    assert!(click(&mut canvas, &mut graph, EMPTY).is_empty());

    click(&mut canvas, &mut graph, A);
    let events = click(&mut canvas, &mut graph, EMPTY);
    assert_eq!(
        events,
        vec![LogicEvent::SelectionCleared, LogicEvent::NodeHovered(None)]
    );

    click(&mut canvas, &mut graph, A);
    click(&mut canvas, &mut graph, A);
    click(&mut canvas, &mut graph, EMPTY);
    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
}

#[test]
fn test_reselect_other_node() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();
    click(&mut canvas, &mut graph, A);
    let events = click(&mut canvas, &mut graph, B);
    assert_eq!(
        *canvas.connection_state(),
        ConnectionState::NodeSelected(id("b"))
    );
    assert!(events.contains(&LogicEvent::NodeSelected(id("b"))));
}

#[test]
fn test_pending_abandoned_when_source_removed() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();
    click(&mut canvas, &mut graph, A);
    click(&mut canvas, &mut graph, A);

    graph.remove_node(&id("a"));
    click(&mut canvas, &mut graph, B);

    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
    assert!(graph.connections().is_empty());
    assert_eq!(graph.node(&id("b")).unwrap().mastery, 60);
}

#[test]
fn test_wheel_zoom_is_center_anchored() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();
    canvas.resize(Vec2::new(800.0, 600.0)).unwrap();

    assert_eq!(canvas.view().scene_to_screen(A), Vec2::new(100.0, 100.0));

    // factor = 1 - (-500 * 0.001) = 1.5
    canvas.handle_pointer(&PointerEvent::wheel(Vec2::new(10.0, 10.0), -500.0), &mut graph);
    assert!((canvas.camera().zoom - 1.5).abs() < 1e-5);

    // Center (400, 300) stays put; (100, 100) is 1.5x further from it.
    let screen = canvas.view().scene_to_screen(A);
    assert!((screen - Vec2::new(-50.0, 0.0)).length() < 1e-3);
    assert_eq!(
        canvas.view().scene_to_screen(Vec2::new(400.0, 300.0)),
        Vec2::new(400.0, 300.0)
    );

    canvas.handle_pointer(&PointerEvent::wheel(Vec2::ZERO, -100_000.0), &mut graph);
    assert_eq!(canvas.camera().zoom, 2.0);
    canvas.handle_pointer(&PointerEvent::wheel(Vec2::ZERO, 100_000.0), &mut graph);
    assert_eq!(canvas.camera().zoom, 0.5);
}

#[test]
fn test_clicks_resolve_through_camera() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();
    canvas.handle_pointer(&PointerEvent::wheel(Vec2::ZERO, -500.0), &mut graph);

    let on_screen = canvas.view().scene_to_screen(B);
    click(&mut canvas, &mut graph, on_screen);
    assert_eq!(
        *canvas.connection_state(),
        ConnectionState::NodeSelected(id("b"))
    );
}

#[test]
fn test_leave_cancels_gesture() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();

    canvas.handle_pointer(&PointerEvent::moved(A), &mut graph);
    canvas.handle_pointer(&PointerEvent::down(A), &mut graph);
    let events = canvas.handle_pointer(&PointerEvent::leave(A), &mut graph);
    assert_eq!(events, vec![LogicEvent::NodeHovered(None)]);

    canvas.handle_pointer(&PointerEvent::up(A), &mut graph);
    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
}

#[test]
fn test_host_entry_points() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();

    assert_eq!(
        canvas.select(&id("c"), &graph),
        vec![LogicEvent::NodeSelected(id("c"))]
    );
    assert!(canvas.cancel_pending_connection().is_empty());

    assert_eq!(
        canvas.start_pending_connection(&id("a"), &graph),
        vec![LogicEvent::ConnectionPending(id("a"))]
    );
    assert!(canvas.select(&id("missing"), &graph).is_empty());

    let events = click(&mut canvas, &mut graph, B);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, LogicEvent::ConnectionCreated { .. }))
    );

    canvas.start_pending_connection(&id("b"), &graph);
    assert_eq!(
        canvas.cancel_pending_connection(),
        vec![LogicEvent::SelectionCleared]
    );
    assert!(canvas.clear_selection().is_empty());
}

#[test]
fn test_self_connection_through_pending_never_creates_edge() {
    let mut canvas = create_canvas();
    let mut graph = create_test_graph();
    canvas.start_pending_connection(&id("c"), &graph);
    click(&mut canvas, &mut graph, Vec2::new(200.0, 300.0));
    assert!(graph.connections().is_empty());
    assert_eq!(*canvas.connection_state(), ConnectionState::Idle);
}
