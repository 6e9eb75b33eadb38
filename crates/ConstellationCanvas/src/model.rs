//! # Core Data Models
//!
//! Concepts, the connections between them, and the per-frame visual flags the
//! painter derives from interaction state. The collections themselves are owned
//! by a [`GraphStore`](crate::store::GraphStore); the engine only reads them and
//! issues discrete mutation calls.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::store::GraphStore;

/// Highest mastery a concept can reach.
pub const MAX_MASTERY: u8 = 100;

/// Stable identifier of a concept, supplied by the content that defines it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(String);

impl ConceptId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConceptId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ConceptId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Knowledge domains. Used for color coding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Science,
    Mathematics,
    History,
    Language,
    Arts,
    Technology,
}

/// A discoverable unit of knowledge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConceptNode {
    pub id: ConceptId,
    pub name: String,
    pub description: String,
    pub domain: Domain,
    /// Proficiency in `0..=100`.
    pub mastery: u8,
    /// Once true, never reverts.
    pub discovered: bool,
    /// Neighbour ids, kept consistent with the store's edge list.
    pub connections: BTreeSet<ConceptId>,
    /// Scene-space position assigned by the content layout. `None` means the
    /// node has no geometry and is skipped for drawing and hit-testing.
    pub position: Option<Vec2>,
}

impl ConceptNode {
    /// An undiscovered concept with no mastery and no position.
    pub fn new(id: impl Into<ConceptId>, name: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            domain,
            mastery: 0,
            discovered: false,
            connections: BTreeSet::new(),
            position: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_mastery(mut self, mastery: u8) -> Self {
        self.mastery = mastery.min(MAX_MASTERY);
        self
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn discovered(mut self) -> Self {
        self.discovered = true;
        self
    }

    /// Whether the node takes part in drawing and hit-testing.
    pub fn is_visible(&self) -> bool {
        self.discovered && self.position.is_some()
    }
}

/// An undirected relationship between two discovered concepts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptConnection {
    pub source: ConceptId,
    pub target: ConceptId,
    /// Average of the endpoint masteries, refreshed whenever either changes.
    pub strength: f32,
    /// Hidden edges exist in the store but are not drawn.
    pub discovered: bool,
}

impl ConceptConnection {
    /// Unordered pair test.
    pub fn connects(&self, a: &ConceptId, b: &ConceptId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    pub fn touches(&self, id: &ConceptId) -> bool {
        &self.source == id || &self.target == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other(&self, id: &ConceptId) -> Option<&ConceptId> {
        if &self.source == id {
            Some(&self.target)
        } else if &self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// Average of two masteries, as stored in [`ConceptConnection::strength`].
pub fn connection_strength(a: u8, b: u8) -> f32 {
    (f32::from(a) + f32::from(b)) / 2.0
}

bitflags! {
    /// Visual state of a node for the current frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// The node is the current selection.
        const SELECTED = 1 << 0;
        /// The pointer is over the node.
        const HOVERED = 1 << 1;
        /// The node was recently discovered.
        const HIGHLIGHTED = 1 << 2;
        /// The node is the source of a pending connection.
        const PENDING = 1 << 3;
        /// Any of the above.
        const ACTIVE = Self::SELECTED.bits()
            | Self::HOVERED.bits()
            | Self::HIGHLIGHTED.bits()
            | Self::PENDING.bits();
    }
}

/// A gate on some piece of content, expressed against the mastery model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// Average mastery over the discovered concepts of a domain.
    Domain { domain: Domain, min_mastery: u8 },
    /// Mastery of one specific discovered concept.
    Concept {
        concept_id: ConceptId,
        min_mastery: u8,
    },
}

impl Requirement {
    pub fn is_met(&self, store: &dyn GraphStore) -> bool {
        match self {
            Requirement::Domain {
                domain,
                min_mastery,
            } => {
                let (sum, count) = store
                    .nodes()
                    .iter()
                    .filter(|n| n.discovered && n.domain == *domain)
                    .fold((0u32, 0u32), |(sum, count), n| {
                        (sum + u32::from(n.mastery), count + 1)
                    });
                count > 0 && sum >= u32::from(*min_mastery) * count
            }
            Requirement::Concept {
                concept_id,
                min_mastery,
            } => store
                .node(concept_id)
                .is_some_and(|n| n.discovered && n.mastery >= *min_mastery),
        }
    }
}
