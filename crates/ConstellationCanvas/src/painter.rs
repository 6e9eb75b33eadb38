use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::config::{CanvasConfig, CanvasStyle};
use crate::hit;
use crate::interaction::InteractionState;
use crate::math::{self, Rect};
use crate::model::{ConceptId, ConceptNode, NodeFlags};
use crate::particles::Particle;
use crate::render::{DrawCommand, Paint, Surface};
use crate::store::GraphStore;
use crate::view::View;

/// A background star in Scene Space.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub radius: f32,
    pub brightness: f32,
}

/// A soft colored cloud behind the stars.
#[derive(Clone, Debug, PartialEq)]
pub struct Nebula {
    pub center: Vec2,
    pub radius: f32,
}

/// Background decoration, generated once and reused for every frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Starfield {
    pub stars: Vec<Star>,
    pub nebulae: Vec<Nebula>,
}

impl Starfield {
    /// Scatters `count` stars and a few nebulae over `bounds`.
    pub fn generate(seed: u64, count: usize, bounds: Rect) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let size = bounds.size().max(Vec2::ONE);
        let point = |rng: &mut StdRng| {
            bounds.min + Vec2::new(rng.gen_range(0.0..size.x), rng.gen_range(0.0..size.y))
        };

        let stars = (0..count)
            .map(|_| Star {
                position: point(&mut rng),
                radius: rng.gen_range(0.4..1.6),
                brightness: rng.gen_range(0.2..1.0),
            })
            .collect();
        let nebulae = (0..3)
            .map(|_| Nebula {
                center: point(&mut rng),
                radius: rng.gen_range(0.15..0.35) * size.min_element(),
            })
            .collect();
        Self { stars, nebulae }
    }
}

/// Everything besides the store that a frame depends on.
pub struct FrameState<'a> {
    pub interaction: &'a InteractionState,
    pub highlights: &'a BTreeSet<ConceptId>,
    pub particles: &'a [Particle],
    pub starfield: &'a Starfield,
    /// Seconds since the engine started. Drives the glow pulse.
    pub time_s: f32,
}

impl FrameState<'_> {
    fn flags(&self, id: &ConceptId) -> NodeFlags {
        let mut flags = NodeFlags::empty();
        let connection = &self.interaction.connection;
        flags.set(NodeFlags::SELECTED, connection.selected() == Some(id));
        flags.set(NodeFlags::PENDING, connection.pending() == Some(id));
        flags.set(
            NodeFlags::HOVERED,
            self.interaction.hovered.as_ref() == Some(id),
        );
        flags.set(NodeFlags::HIGHLIGHTED, self.highlights.contains(id));
        flags
    }
}

/// Renders the constellation into a [`Surface`].
///
/// Draw order is fixed: clear, background, edges, nodes, link preview,
/// particles, labels. Everything after the clear sits inside one camera transform.
pub struct Painter;

impl Painter {
    pub fn draw_scene<S: GraphStore + ?Sized>(
        view: &View,
        config: &CanvasConfig,
        store: &S,
        frame: &FrameState<'_>,
        surface: &mut dyn Surface,
    ) {
        let style = &config.style;

        surface.draw(DrawCommand::Clear {
            color: style.background_color,
        });
        surface.draw(DrawCommand::PushTransform(view.transform()));

        Self::draw_background(view, style, frame.starfield, surface);
        Self::draw_edges(config, store, frame, surface);

        for node in store.nodes().iter().filter(|n| n.discovered) {
            match node.position {
                Some(position) => Self::draw_node(config, node, position, frame, surface),
                None => tracing::trace!(concept = %node.id, "Skipping concept without position"),
            }
        }

        Self::draw_link_preview(config, store, frame, surface);

        for particle in frame.particles {
            surface.draw(DrawCommand::Circle {
                center: particle.position,
                radius: particle.size,
                paint: Paint::Solid(math::with_alpha(
                    particle.color,
                    particle.color.w * particle.opacity(),
                )),
            });
        }

        Self::draw_labels(config, store, frame, surface);

        surface.draw(DrawCommand::PopTransform);
    }

    /// Stars outside the visible scene rectangle are culled.
    fn draw_background(
        view: &View,
        style: &CanvasStyle,
        starfield: &Starfield,
        surface: &mut dyn Surface,
    ) {
        for nebula in &starfield.nebulae {
            surface.draw(DrawCommand::Circle {
                center: nebula.center,
                radius: nebula.radius,
                paint: Paint::RadialGradient {
                    center: nebula.center,
                    radius: nebula.radius,
                    inner: style.nebula_color,
                    outer: math::with_alpha(style.nebula_color, 0.0),
                },
            });
        }

        let top_left = view.screen_to_scene(Vec2::ZERO);
        let visible = Rect {
            min: top_left,
            max: view.screen_to_scene(view.viewport_size),
        }
        .expand(2.0);
        for star in starfield.stars.iter().filter(|s| visible.contains(s.position)) {
            surface.draw(DrawCommand::Circle {
                center: star.position,
                radius: star.radius,
                paint: Paint::Solid(math::with_alpha(
                    style.star_color,
                    style.star_color.w * star.brightness,
                )),
            });
        }
    }

    fn draw_edges<S: GraphStore + ?Sized>(
        config: &CanvasConfig,
        store: &S,
        frame: &FrameState<'_>,
        surface: &mut dyn Surface,
    ) {
        let style = &config.style;
        let focused = frame.interaction.connection.focused();

        for connection in store.connections().iter().filter(|c| c.discovered) {
            let (Some(a), Some(b)) = (
                store.node(&connection.source),
                store.node(&connection.target),
            ) else {
                tracing::trace!(
                    source = %connection.source,
                    target = %connection.target,
                    "Skipping edge with a dangling endpoint"
                );
                continue;
            };
            if !(a.is_visible() && b.is_visible()) {
                continue;
            }
            let (Some(start), Some(end)) = (a.position, b.position) else {
                continue;
            };

            let t = (connection.strength / 100.0).clamp(0.0, 1.0);
            let width = 1.0 + 2.5 * t;
            let alpha = 0.25 + 0.6 * t;
            let emphasized = focused.is_some_and(|id| connection.touches(id));

            let (paint, width) = if emphasized {
                (Paint::Solid(style.highlight_color), width + 1.0)
            } else {
                let palette = &style.domains;
                (
                    Paint::LinearGradient {
                        start,
                        end,
                        from: math::with_alpha(palette.color(a.domain), alpha),
                        to: math::with_alpha(palette.color(b.domain), alpha),
                    },
                    width,
                )
            };
            surface.draw(DrawCommand::Line {
                start,
                end,
                width,
                paint,
                dash: None,
            });
        }
    }

    fn draw_node(
        config: &CanvasConfig,
        node: &ConceptNode,
        position: Vec2,
        frame: &FrameState<'_>,
        surface: &mut dyn Surface,
    ) {
        let style = &config.style;
        let radius = hit::base_radius(node.mastery, config);
        let color = style.domains.color(node.domain);
        let mastery = f32::from(node.mastery) / 100.0;
        let active = frame.flags(&node.id).intersects(NodeFlags::ACTIVE);

        if active {
            let pulse = 1.0 + 0.15 * (frame.time_s * 3.0).sin();
            let glow = radius * 2.4 * pulse;
            surface.draw(DrawCommand::Circle {
                center: position,
                radius: glow,
                paint: Paint::RadialGradient {
                    center: position,
                    radius: glow,
                    inner: math::with_alpha(color, 0.55),
                    outer: math::with_alpha(color, 0.0),
                },
            });
        }

        let brightness = (0.55 + 0.45 * mastery) * if active { 1.35 } else { 1.0 };
        surface.draw(DrawCommand::Circle {
            center: position,
            radius,
            paint: Paint::Solid(math::brighten(color, brightness)),
        });

        // Specular highlight, upper left.
        surface.draw(DrawCommand::Circle {
            center: position - Vec2::splat(radius * 0.3),
            radius: radius * 0.35,
            paint: Paint::Solid(Vec4::new(1.0, 1.0, 1.0, 0.35)),
        });

        let ring = radius + 3.0;
        surface.draw(DrawCommand::Arc {
            center: position,
            radius: ring,
            start_angle: -FRAC_PI_2,
            sweep: TAU,
            width: 1.5,
            color: math::with_alpha(style.highlight_color, 0.15),
        });
        if node.mastery > 0 {
            surface.draw(DrawCommand::Arc {
                center: position,
                radius: ring,
                start_angle: -FRAC_PI_2,
                sweep: TAU * mastery,
                width: 2.0,
                color: math::with_alpha(math::brighten(color, 1.2), 0.9),
            });
        }
    }

    fn draw_link_preview<S: GraphStore + ?Sized>(
        config: &CanvasConfig,
        store: &S,
        frame: &FrameState<'_>,
        surface: &mut dyn Surface,
    ) {
        let Some(source) = frame.interaction.connection.pending() else {
            return;
        };
        let Some(end) = frame.interaction.pointer_scene else {
            return;
        };
        let Some(start) = store.node(source).filter(|n| n.is_visible()).and_then(|n| n.position)
        else {
            return;
        };
        surface.draw(DrawCommand::Line {
            start,
            end,
            width: 1.5,
            paint: Paint::Solid(config.style.preview_color),
            dash: Some([6.0, 4.0]),
        });
    }

    fn draw_labels<S: GraphStore + ?Sized>(
        config: &CanvasConfig,
        store: &S,
        frame: &FrameState<'_>,
        surface: &mut dyn Surface,
    ) {
        let style = &config.style;
        for node in store.nodes().iter().filter(|n| n.is_visible()) {
            let Some(position) = node.position else {
                continue;
            };
            let active = frame.flags(&node.id).intersects(NodeFlags::ACTIVE);
            if !(active || config.show_all_labels) {
                continue;
            }
            let radius = hit::base_radius(node.mastery, config);
            surface.draw(DrawCommand::Text {
                pos: position + Vec2::new(0.0, radius + 14.0),
                text: node.name.clone(),
                color: style.label_color,
                size: style.label_size,
            });
        }
    }
}
