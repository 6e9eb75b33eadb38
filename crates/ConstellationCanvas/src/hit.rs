//! Hit testing in Scene Space.

use glam::Vec2;

use crate::config::CanvasConfig;
use crate::model::{ConceptId, ConceptNode, MAX_MASTERY};

/// Drawn radius of a node. Grows linearly with mastery.
pub fn base_radius(mastery: u8, config: &CanvasConfig) -> f32 {
    let t = f32::from(mastery.min(MAX_MASTERY)) / f32::from(MAX_MASTERY);
    config.min_node_radius + (config.max_node_radius - config.min_node_radius) * t
}

/// Radius within which a point counts as "on" the node.
pub fn hit_radius(mastery: u8, config: &CanvasConfig) -> f32 {
    base_radius(mastery, config) + config.hit_padding
}

/// Finds the first discovered, positioned node whose hit circle contains `scene_pos`.
///
/// Overlaps resolve in list order, so the result is deterministic.
pub fn find_node_at<'a>(
    scene_pos: Vec2,
    nodes: &'a [ConceptNode],
    config: &CanvasConfig,
) -> Option<&'a ConceptId> {
    nodes.iter().filter(|node| node.is_visible()).find_map(|node| {
        let position = node.position?;
        let radius = hit_radius(node.mastery, config);
        (position.distance_squared(scene_pos) <= radius * radius).then_some(&node.id)
    })
}
