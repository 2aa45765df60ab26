//! OPEN: an ordered frontier over [`NodeId`]s, with an in-place swappable
//! comparator (spec §3 "OPEN" and design note "Swap-comparator heap").

use crate::search::domain::Cost;
use crate::search::node::{Node, NodeArena, NodeId};
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The five orderings the core ever sorts OPEN by. Each carries its own
/// tie-break chain as specified in spec §3; a deterministic state-key is
/// appended as a final tie-break in every case so that iteration order (and
/// hence test traces) is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// By f, tie-break higher g first, then state-key.
    F,
    /// By f-hat, tie-break f, then higher g, then state-key.
    FHat,
    /// By h, tie-break higher g first, then state-key.
    H,
    /// By h-hat, tie-break higher g first, then state-key.
    HHat,
    /// By backed-up h-hat (ascending), as produced by the Nancy backup.
    BackupHHat,
}

/// `(primary, secondary, higher-g-first, state-key)`. Smaller sorts first.
type OrderKey = (Cost, Cost, Reverse<Cost>, u64);

fn state_key<S: Hash>(state: &S) -> u64 {
    let mut hasher = DefaultHasher::new();
    state.hash(&mut hasher);
    hasher.finish()
}

fn key_for<S: Hash>(comparator: Comparator, node: &Node<S>) -> OrderKey {
    let tie_g = Reverse(node.g);
    let key = state_key(&node.state);
    match comparator {
        Comparator::F => (node.f(), node.f(), tie_g, key),
        Comparator::FHat => (node.f_hat(), node.f(), tie_g, key),
        Comparator::H => (node.h, node.h, tie_g, key),
        Comparator::HHat => (node.h_hat(), node.h_hat(), tie_g, key),
        Comparator::BackupHHat => (node.backup_h_hat, node.backup_h_hat, tie_g, key),
    }
}

/// The frontier. See spec §3: supports peek-min, pop-min, update-position,
/// membership test, and swap-comparator.
#[derive(Debug, Clone)]
pub struct OpenList {
    comparator: Comparator,
    queue: PriorityQueue<NodeId, Reverse<OrderKey>>,
}

impl OpenList {
    pub fn new(comparator: Comparator) -> Self {
        Self {
            comparator,
            queue: PriorityQueue::new(),
        }
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.queue.get(&id).is_some()
    }

    pub fn peek_top(&self) -> Option<NodeId> {
        self.queue.peek().map(|(id, _)| *id)
    }

    pub fn pop_top(&mut self) -> Option<NodeId> {
        self.queue.pop().map(|(id, _)| id)
    }

    pub fn push<S: Hash>(&mut self, id: NodeId, arena: &NodeArena<S>) {
        let key = key_for(self.comparator, arena.get(id));
        self.queue.push(id, Reverse(key));
    }

    /// Re-sift `id` after its underlying node fields changed externally.
    pub fn update<S: Hash>(&mut self, id: NodeId, arena: &NodeArena<S>) {
        let key = key_for(self.comparator, arena.get(id));
        self.queue.change_priority(&id, Reverse(key));
    }

    /// Change ordering and re-heapify in place: every resident entry keeps
    /// its identity, only its priority key is recomputed under the new
    /// comparator.
    pub fn swap_comparator<S: Hash>(&mut self, comparator: Comparator, arena: &NodeArena<S>) {
        self.comparator = comparator;
        let ids: Vec<NodeId> = self.queue.iter().map(|(id, _)| *id).collect();
        for id in ids {
            let key = key_for(comparator, arena.get(id));
            self.queue.change_priority(&id, Reverse(key));
        }
    }

    pub fn iter_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.queue.iter().map(|(id, _)| *id)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
