use constellation_canvas::input::{PointerButton, PointerEvent, PointerKind};
use constellation_canvas::math;
use constellation_canvas::model::{ConceptId, ConceptNode, Domain};
use constellation_canvas::render::{DrawCommand, Paint, RenderList};
use constellation_canvas::scheduler::ManualFrameRequester;
use constellation_canvas::store::GraphStore;
use constellation_canvas::view::CameraTransform;
use constellation_canvas::{CanvasConfig, Constellation, InMemoryGraphStore};
use glam::{Vec2, Vec4};
use macroquad::prelude as mq;

/// Pixels of wheel travel per macroquad wheel unit.
const WHEEL_SCALE: f32 = 100.0;
/// Segments used to approximate arcs and gradients.
const ARC_SEGMENTS: usize = 48;
const GRADIENT_STEPS: usize = 8;

fn sample_store() -> InMemoryGraphStore {
    let concepts = [
        ("photosynthesis", "Photosynthesis", Domain::Science, 45, true),
        ("cell", "Cell", Domain::Science, 70, true),
        ("dna", "DNA", Domain::Science, 20, false),
        ("algebra", "Algebra", Domain::Mathematics, 80, true),
        ("geometry", "Geometry", Domain::Mathematics, 35, true),
        ("calculus", "Calculus", Domain::Mathematics, 5, false),
        ("rome", "Roman Empire", Domain::History, 50, true),
        ("renaissance", "Renaissance", Domain::History, 15, false),
        ("grammar", "Grammar", Domain::Language, 60, true),
        ("poetry", "Poetry", Domain::Arts, 25, true),
        ("perspective", "Perspective", Domain::Arts, 10, false),
        ("computing", "Computing", Domain::Technology, 90, true),
    ];

    let center = Vec2::new(640.0, 360.0);
    let count = concepts.len() as f32;
    InMemoryGraphStore::with_nodes(concepts.into_iter().enumerate().map(
        |(i, (id, name, domain, mastery, discovered))| {
            let angle = i as f32 / count * std::f32::consts::TAU;
            let ring = if i % 2 == 0 { 260.0 } else { 170.0 };
            let node = ConceptNode::new(id, name, domain)
                .with_mastery(mastery)
                .at(center + Vec2::from_angle(angle) * ring);
            if discovered { node.discovered() } else { node }
        },
    ))
}

fn color(c: Vec4) -> mq::Color {
    mq::Color::new(c.x, c.y, c.z, c.w)
}

/// Replays a display list with macroquad's immediate-mode primitives.
#[derive(Default)]
struct Replayer {
    stack: Vec<CameraTransform>,
}

impl Replayer {
    fn current(&self) -> CameraTransform {
        self.stack.last().copied().unwrap_or(CameraTransform {
            translation: Vec2::ZERO,
            scale: 1.0,
        })
    }

    fn push(&mut self, inner: CameraTransform) {
        let outer = self.current();
        self.stack.push(CameraTransform {
            translation: outer.translation + inner.translation * outer.scale,
            scale: outer.scale * inner.scale,
        });
    }

    fn line(&self, start: Vec2, end: Vec2, width: f32, c: Vec4) {
        let t = self.current();
        let (a, b) = (t.apply(start), t.apply(end));
        mq::draw_line(a.x, a.y, b.x, b.y, width * t.scale, color(c));
    }

    fn replay(&mut self, list: &RenderList) {
        self.stack.clear();
        for cmd in list {
            match cmd {
                DrawCommand::Clear { color: c } => mq::clear_background(color(*c)),
                DrawCommand::PushTransform(t) => self.push(*t),
                DrawCommand::PopTransform => {
                    self.stack.pop();
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    paint,
                } => {
                    let t = self.current();
                    let p = t.apply(*center);
                    let r = radius * t.scale;
                    match paint {
                        Paint::RadialGradient { inner, outer, .. } => {
                            for step in 0..GRADIENT_STEPS {
                                let f = step as f32 / GRADIENT_STEPS as f32;
                                let c = math::mix(*outer, *inner, f);
                                let c = math::with_alpha(c, c.w / GRADIENT_STEPS as f32);
                                mq::draw_circle(p.x, p.y, r * (1.0 - f), color(c));
                            }
                        }
                        other => mq::draw_circle(p.x, p.y, r, color(other.average())),
                    }
                }
                DrawCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep,
                    width,
                    color: c,
                } => {
                    let segments = ((ARC_SEGMENTS as f32 * sweep.abs() / std::f32::consts::TAU)
                        .ceil() as usize)
                        .max(1);
                    let point = |i: usize| {
                        let angle = start_angle + sweep * i as f32 / segments as f32;
                        *center + Vec2::from_angle(angle) * *radius
                    };
                    for i in 0..segments {
                        self.line(point(i), point(i + 1), *width, *c);
                    }
                }
                DrawCommand::Line {
                    start,
                    end,
                    width,
                    paint,
                    dash,
                } => {
                    let segments = match dash {
                        Some([on, off]) => math::dash_segments(*start, *end, *on, *off),
                        None => vec![(*start, *end)],
                    };
                    for (a, b) in segments {
                        match paint {
                            Paint::LinearGradient {
                                start: g0,
                                end: g1,
                                from,
                                to,
                            } => {
                                let span = g0.distance_squared(*g1).max(f32::EPSILON);
                                for step in 0..GRADIENT_STEPS {
                                    let s0 = a.lerp(b, step as f32 / GRADIENT_STEPS as f32);
                                    let s1 = a.lerp(b, (step + 1) as f32 / GRADIENT_STEPS as f32);
                                    let mid = math::midpoint(s0, s1);
                                    let f = (mid - *g0).dot(*g1 - *g0) / span;
                                    self.line(s0, s1, *width, math::mix(*from, *to, f));
                                }
                            }
                            other => self.line(a, b, *width, other.average()),
                        }
                    }
                }
                DrawCommand::Text {
                    pos,
                    text,
                    color: c,
                    size,
                } => {
                    let t = self.current();
                    let p = t.apply(*pos);
                    let font = (size * t.scale).max(1.0);
                    let dims = mq::measure_text(text, None, font as u16, 1.0);
                    mq::draw_text(text, p.x - dims.width * 0.5, p.y, font, color(*c));
                }
            }
        }
    }
}

fn pointer_events(pos: Vec2) -> Vec<PointerEvent> {
    let buttons = [
        (mq::MouseButton::Left, PointerButton::Primary),
        (mq::MouseButton::Right, PointerButton::Secondary),
        (mq::MouseButton::Middle, PointerButton::Middle),
    ];
    let now = (mq::get_time() * 1000.0) as u64;

    let mut events = vec![PointerEvent::moved(pos).at_time(now)];
    for (mq_button, button) in buttons {
        if mq::is_mouse_button_pressed(mq_button) {
            events.push(PointerEvent::down(pos).with_button(button).at_time(now));
        }
        if mq::is_mouse_button_released(mq_button) {
            events.push(PointerEvent::up(pos).with_button(button).at_time(now));
        }
    }
    let wheel = mq::mouse_wheel().1;
    if wheel != 0.0 {
        events.push(PointerEvent::wheel(pos, -wheel * WHEEL_SCALE).at_time(now));
    }
    events
}

async fn run() -> anyhow::Result<()> {
    let mut canvas = Constellation::new(CanvasConfig::default(), ManualFrameRequester::new())?;
    let mut store = sample_store();
    let mut replayer = Replayer::default();
    let mut list = RenderList::new();
    let mut last_pos = None;
    let mut last_size = Vec2::ZERO;

    tracing::info!(concepts = store.nodes().len(), "Playground ready");

    loop {
        let size = Vec2::new(mq::screen_width(), mq::screen_height());
        if size != last_size {
            canvas.resize(size)?;
            last_size = size;
        }

        let (mx, my) = mq::mouse_position();
        let pos = Vec2::new(mx, my);
        for event in pointer_events(pos) {
            // Skip redundant moves so hover bookkeeping stays quiet.
            if matches!(event.kind, PointerKind::Move) && last_pos == Some(pos) {
                continue;
            }
            for logic in canvas.handle_pointer(&event, &mut store) {
                tracing::info!(event = ?logic, "Logic event");
            }
        }
        last_pos = Some(pos);

        if mq::is_key_pressed(mq::KeyCode::Escape) {
            canvas.cancel_pending_connection();
        }
        if mq::is_key_pressed(mq::KeyCode::R) {
            canvas.reset_camera();
        }
        if mq::is_key_pressed(mq::KeyCode::C) {
            canvas.clear_highlights();
        }
        if mq::is_key_pressed(mq::KeyCode::D) {
            let hidden: Option<ConceptId> = store
                .nodes()
                .iter()
                .find(|n| !n.discovered)
                .map(|n| n.id.clone());
            if let Some(id) = hidden {
                store.discover(&id);
                canvas.sync_discoveries(&mut store);
            }
        }

        if let Some(handle) = canvas.requester_mut().take_due() {
            let mut fresh = RenderList::new();
            if canvas.on_animation_frame(handle, &store, Some(&mut fresh), mq::get_time() as f32)
            {
                list = fresh;
            }
        }

        // Immediate mode: the last display list is replayed every frame.
        replayer.replay(&list);
        mq::draw_text(
            &format!("{:?}  cursor: {:?}", canvas.connection_state(), canvas.cursor()),
            12.0,
            24.0,
            20.0,
            mq::GRAY,
        );

        mq::next_frame().await
    }
}

#[macroquad::main("Constellation Playground")]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(e) = run().await {
        tracing::error!(error = %e, "Playground stopped");
    }
}
