//! # Graph Store
//!
//! The engine never owns mastery truth. It reads concepts and connections
//! through [`GraphStore`] and writes back through its two mutation calls.
//! [`InMemoryGraphStore`] is the reference implementation used by hosts that
//! have nothing better and by the tests.

use glam::Vec2;
use std::collections::HashMap;

use crate::model::{
    ConceptConnection, ConceptId, ConceptNode, MAX_MASTERY, connection_strength,
};

/// Result of asking the store to link two concepts.
///
/// Only `Created` mutates the graph. Every other variant is a rejected
/// attempt that leaves the store untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectOutcome {
    Created(ConceptConnection),
    AlreadyConnected,
    SelfLoop,
    UnknownConcept(ConceptId),
    Undiscovered(ConceptId),
}

impl ConnectOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, ConnectOutcome::Created(_))
    }
}

/// The data-owning collaborator the engine renders and mutates.
pub trait GraphStore {
    /// All concepts. Iteration order is the hit-test tie-break order.
    fn nodes(&self) -> &[ConceptNode];

    /// All connections, discovered or not.
    fn connections(&self) -> &[ConceptConnection];

    fn node(&self, id: &ConceptId) -> Option<&ConceptNode> {
        self.nodes().iter().find(|n| &n.id == id)
    }

    fn are_connected(&self, a: &ConceptId, b: &ConceptId) -> bool {
        self.connections().iter().any(|c| c.connects(a, b))
    }

    /// Links two discovered concepts. Idempotent for an existing pair.
    fn create_connection(&mut self, a: &ConceptId, b: &ConceptId) -> ConnectOutcome;

    /// Applies a mastery delta, clamped to `0..=100`. Returns the new value,
    /// or `None` if the concept is unknown.
    fn update_mastery(&mut self, id: &ConceptId, delta: i32) -> Option<u8>;

    /// Concepts discovered since the last [`reset_newly_discovered`](Self::reset_newly_discovered).
    fn newly_discovered(&self) -> Vec<ConceptId>;

    fn reset_newly_discovered(&mut self);
}

/// A `Vec`-backed store with an id index.
#[derive(Clone, Debug, Default)]
pub struct InMemoryGraphStore {
    nodes: Vec<ConceptNode>,
    index: HashMap<ConceptId, usize>,
    connections: Vec<ConceptConnection>,
    newly_discovered: Vec<ConceptId>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a list of concepts, in order.
    pub fn with_nodes(nodes: impl IntoIterator<Item = ConceptNode>) -> Self {
        let mut store = Self::new();
        for node in nodes {
            store.insert_node(node);
        }
        store
    }

    /// Inserts a concept, or replaces the content of an existing one.
    ///
    /// Replacing keeps the neighbour set owned by the store and never turns a
    /// discovered concept back into an undiscovered one. A replacement that
    /// reveals the concept counts as its discovery, and a mastery change
    /// refreshes the strength of its edges.
    pub fn insert_node(&mut self, mut node: ConceptNode) {
        node.mastery = node.mastery.min(MAX_MASTERY);
        match self.index.get(&node.id) {
            Some(&idx) => {
                let existing = &mut self.nodes[idx];
                let revealed = node.discovered && !existing.discovered;
                let mastery_changed = node.mastery != existing.mastery;
                node.discovered |= existing.discovered;
                node.connections = std::mem::take(&mut existing.connections);
                let id = node.id.clone();
                *existing = node;

                if revealed {
                    tracing::debug!(concept = %id, "Concept discovered by replacement");
                    self.newly_discovered.push(id.clone());
                }
                if mastery_changed {
                    self.refresh_strengths(&id);
                }
            }
            None => {
                node.connections.clear();
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Marks a concept discovered. Returns `true` only on the first discovery,
    /// which is also when it joins the newly-discovered set.
    pub fn discover(&mut self, id: &ConceptId) -> bool {
        let Some(&idx) = self.index.get(id) else {
            return false;
        };
        let node = &mut self.nodes[idx];
        if node.discovered {
            return false;
        }
        node.discovered = true;
        self.newly_discovered.push(id.clone());
        tracing::debug!(concept = %id, "Concept discovered");
        true
    }

    /// Same validation as [`GraphStore::create_connection`], but lets the
    /// store seed edges that stay hidden until revealed.
    pub fn insert_connection(
        &mut self,
        a: &ConceptId,
        b: &ConceptId,
        discovered: bool,
    ) -> ConnectOutcome {
        let (ia, ib) = match self.validate_pair(a, b) {
            Ok(indices) => indices,
            Err(rejected) => return rejected,
        };

        let connection = ConceptConnection {
            source: a.clone(),
            target: b.clone(),
            strength: connection_strength(self.nodes[ia].mastery, self.nodes[ib].mastery),
            discovered,
        };
        self.nodes[ia].connections.insert(b.clone());
        self.nodes[ib].connections.insert(a.clone());
        self.connections.push(connection.clone());
        ConnectOutcome::Created(connection)
    }

    /// Makes a hidden edge visible. Returns `false` if there is no such edge.
    pub fn reveal_connection(&mut self, a: &ConceptId, b: &ConceptId) -> bool {
        match self.connections.iter_mut().find(|c| c.connects(a, b)) {
            Some(connection) => {
                connection.discovered = true;
                true
            }
            None => false,
        }
    }

    /// Removes a concept together with its edges and neighbour references.
    pub fn remove_node(&mut self, id: &ConceptId) -> Option<ConceptNode> {
        let idx = self.index.remove(id)?;
        let removed = self.nodes.remove(idx);

        self.connections.retain(|c| !c.touches(id));
        for node in &mut self.nodes {
            node.connections.remove(id);
        }
        self.newly_discovered.retain(|n| n != id);
        self.reindex();
        Some(removed)
    }

    pub fn set_position(&mut self, id: &ConceptId, position: Option<Vec2>) -> bool {
        match self.index.get(id) {
            Some(&idx) => {
                self.nodes[idx].position = position;
                true
            }
            None => false,
        }
    }

    /// Recomputes the strength of every edge touching `id`.
    fn refresh_strengths(&mut self, id: &ConceptId) {
        let Self {
            nodes,
            index,
            connections,
            ..
        } = self;
        let Some(mastery) = index.get(id).map(|&i| nodes[i].mastery) else {
            return;
        };
        for connection in connections.iter_mut().filter(|c| c.touches(id)) {
            let other = connection
                .other(id)
                .and_then(|other| index.get(other))
                .map(|&i| nodes[i].mastery);
            if let Some(other) = other {
                connection.strength = connection_strength(mastery, other);
            }
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    fn validate_pair(
        &self,
        a: &ConceptId,
        b: &ConceptId,
    ) -> Result<(usize, usize), ConnectOutcome> {
        if a == b {
            return Err(ConnectOutcome::SelfLoop);
        }
        let ia = *self
            .index
            .get(a)
            .ok_or_else(|| ConnectOutcome::UnknownConcept(a.clone()))?;
        let ib = *self
            .index
            .get(b)
            .ok_or_else(|| ConnectOutcome::UnknownConcept(b.clone()))?;
        if !self.nodes[ia].discovered {
            return Err(ConnectOutcome::Undiscovered(a.clone()));
        }
        if !self.nodes[ib].discovered {
            return Err(ConnectOutcome::Undiscovered(b.clone()));
        }
        if self.are_connected(a, b) {
            return Err(ConnectOutcome::AlreadyConnected);
        }
        Ok((ia, ib))
    }
}

impl GraphStore for InMemoryGraphStore {
    fn nodes(&self) -> &[ConceptNode] {
        &self.nodes
    }

    fn connections(&self) -> &[ConceptConnection] {
        &self.connections
    }

    fn node(&self, id: &ConceptId) -> Option<&ConceptNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    fn create_connection(&mut self, a: &ConceptId, b: &ConceptId) -> ConnectOutcome {
        self.insert_connection(a, b, true)
    }

    fn update_mastery(&mut self, id: &ConceptId, delta: i32) -> Option<u8> {
        let &idx = self.index.get(id)?;
        let current = i32::from(self.nodes[idx].mastery);
        let updated = current.saturating_add(delta).clamp(0, i32::from(MAX_MASTERY)) as u8;
        self.nodes[idx].mastery = updated;
        self.refresh_strengths(id);
        Some(updated)
    }

    fn newly_discovered(&self) -> Vec<ConceptId> {
        self.newly_discovered.clone()
    }

    fn reset_newly_discovered(&mut self) {
        self.newly_discovered.clear();
    }
}
