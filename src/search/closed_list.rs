//! CLOSED: a map from state to the currently-owning node (spec §3).

use crate::search::node::NodeId;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct ClosedMap<S: Eq + Hash> {
    by_state: HashMap<S, NodeId>,
}

impl<S: Eq + Hash + Clone> ClosedMap<S> {
    pub fn new() -> Self {
        Self {
            by_state: HashMap::new(),
        }
    }

    pub fn get(&self, state: &S) -> Option<NodeId> {
        self.by_state.get(state).copied()
    }

    pub fn insert(&mut self, state: S, id: NodeId) {
        self.by_state.insert(state, id);
    }

    pub fn remove(&mut self, state: &S) {
        self.by_state.remove(state);
    }

    pub fn is_empty(&self) -> bool {
        self.by_state.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_state.len()
    }

    pub fn clear(&mut self) {
        self.by_state.clear();
    }

    pub fn values(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.by_state.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &NodeId)> {
        self.by_state.iter()
    }
}

impl<S: Eq + Hash + Clone> Default for ClosedMap<S> {
    fn default() -> Self {
        Self::new()
    }
}
