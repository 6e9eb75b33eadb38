use constellation_canvas::input::PointerEvent;
use constellation_canvas::model::{ConceptId, ConceptNode, Domain};
use constellation_canvas::render::{DrawCommand, RenderList};
use constellation_canvas::scheduler::ManualFrameRequester;
use constellation_canvas::store::GraphStore;
use constellation_canvas::{CanvasConfig, Constellation, InMemoryGraphStore};
use glam::Vec2;

fn main() {
    println!("=== ConstellationCanvas Headless Demo ===");

    // 1. Initialize the engine with a host-driven frame loop
    let mut canvas = Constellation::new(CanvasConfig::default(), ManualFrameRequester::new())
        .expect("default config is valid");
    canvas
        .resize(Vec2::new(1280.0, 720.0))
        .expect("viewport is valid");

    // 2. Populate the store
    let mut store = InMemoryGraphStore::with_nodes([
        ConceptNode::new("light", "Light", Domain::Science)
            .with_mastery(40)
            .at(Vec2::new(400.0, 300.0))
            .discovered(),
        ConceptNode::new("optics", "Optics", Domain::Science)
            .with_mastery(60)
            .at(Vec2::new(700.0, 360.0))
            .discovered(),
        ConceptNode::new("lens", "Lens", Domain::Technology)
            .with_mastery(10)
            .at(Vec2::new(560.0, 520.0)),
    ]);
    println!("Created store with {} concepts", store.nodes().len());

    // 3. Script a few interactions: select, arm, link, discover
    let light = Vec2::new(400.0, 300.0);
    let optics = Vec2::new(700.0, 360.0);
    let clicks = [light, light, optics];

    for (frame, pos) in clicks.into_iter().enumerate() {
        println!("\n--- Click {} at {} ---", frame, pos);
        let mut events = canvas.handle_pointer(&PointerEvent::down(pos), &mut store);
        events.extend(canvas.handle_pointer(&PointerEvent::up(pos), &mut store));
        println!("  Logic Events: {:?}", events);
        println!("  State: {:?}", canvas.connection_state());
    }

    store.discover(&ConceptId::new("lens"));
    let highlighted = canvas.sync_discoveries(&mut store);
    println!("\nHighlighted {} new concept(s)", highlighted);

    // 4. Drive frames until the scene settles
    let mut frames = 0;
    let mut list = RenderList::new();
    while let Some(handle) = canvas.requester_mut().take_due() {
        list.clear();
        canvas.on_animation_frame(handle, &store, Some(&mut list), frames as f32 / 60.0);
        frames += 1;
        if frames % 10 == 0 {
            println!(
                "  Frame {:>3}: {} commands, {} particles",
                frames,
                list.len(),
                canvas.particles().len()
            );
        }
    }

    let circles = list
        .iter()
        .filter(|c| matches!(c, DrawCommand::Circle { .. }))
        .count();
    println!("\nSettled after {} frames ({} circles in last frame)", frames, circles);
    for node in store.nodes() {
        println!("  {:<8} mastery {:>3}", node.name, node.mastery);
    }

    println!("\nDemo Complete.");
}
