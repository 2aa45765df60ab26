//! Search-tree nodes and the arena that owns them.
//!
//! Nodes form a tree via `parent` links that is walked both forward
//! (extracting a path) and backward (the Nancy backup, the learning
//! Dijkstra pass). Rust has no tracing GC, so — per spec §9 — the arena is
//! the owner and `parent`/`nancy_frontier` are non-owning indices into it.

use crate::search::domain::Cost;
use segvec::{Linear, SegVec};

/// Index of a [`Node`] inside a [`NodeArena`]. Cheap to copy, stable for
/// the lifetime of the arena (the arena never removes entries, only grows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Sentinel meaning "no parent" / "no frontier pointer yet".
pub const NO_NODE: NodeId = NodeId(usize::MAX);

impl NodeId {
    fn index(self) -> usize {
        self.0
    }
}

/// A search-tree record associated with a domain state. See spec §3 for the
/// full semantics of each field.
#[derive(Debug, Clone)]
pub struct Node<S> {
    pub state: S,
    pub g: Cost,
    pub h: Cost,
    pub d: Cost,
    pub derr: Cost,
    /// Path-based one-step heuristic error average.
    pub eps_h: f64,
    /// Path-based one-step distance error average.
    pub eps_d: f64,
    pub expansion_counter: u32,
    pub parent: NodeId,
    pub open: bool,
    pub delay_cntr: u32,
    /// Best backed-up f-hat value, rewritten by each Nancy backup.
    pub backup_h_hat: Cost,
    /// Frontier node the current `backup_h_hat` was derived from.
    pub nancy_frontier: NodeId,
}

impl<S> Node<S> {
    pub fn f(&self) -> Cost {
        self.g + self.h
    }

    /// d-hat: corrected steps-to-go. `+infinity` whenever `eps_d >= 1`
    /// (numerical guard specified in spec §3).
    pub fn d_hat(&self) -> Cost {
        if self.eps_d >= 1.0 {
            Cost::from(f64::INFINITY)
        } else {
            self.derr / Cost::from(1.0 - self.eps_d)
        }
    }

    /// h-hat: corrected cost-to-go.
    pub fn h_hat(&self) -> Cost {
        let d_hat = self.d_hat();
        if d_hat.into_inner().is_infinite() {
            Cost::from(f64::INFINITY)
        } else {
            self.h + d_hat * Cost::from(self.eps_h)
        }
    }

    pub fn f_hat(&self) -> Cost {
        let h_hat = self.h_hat();
        if h_hat.into_inner().is_infinite() {
            Cost::from(f64::INFINITY)
        } else {
            self.g + h_hat
        }
    }

    /// Blend a one-step error residual into this node's path-based running
    /// mean (spec §4.2 step 6). Below 5 samples the running mean is left
    /// untouched at its inherited value.
    pub fn push_path_based_epsilons(&mut self, eps_h_residual: f64, eps_d_residual: f64) {
        self.expansion_counter += 1;
        if self.expansion_counter < 5 {
            return;
        }
        let n = self.expansion_counter as f64;
        self.eps_h -= self.eps_h / n;
        self.eps_h += eps_h_residual / n;
        self.eps_d -= self.eps_d / n;
        self.eps_d += eps_d_residual / n;
    }
}

/// Owns every [`Node`] ever generated during the current iteration. OPEN
/// and CLOSED only ever hold [`NodeId`]s that index into this arena.
#[derive(Debug)]
pub struct NodeArena<S> {
    nodes: SegVec<Node<S>, Linear>,
}

impl<S> NodeArena<S> {
    pub fn new() -> Self {
        Self {
            nodes: SegVec::new(),
        }
    }

    /// Reset the arena to hold only `root`, which becomes index `0`. Used
    /// at the top of every iteration (spec §3 "Lifecycle").
    pub fn reset_with_root(&mut self, root: Node<S>) -> NodeId {
        self.nodes = SegVec::new();
        self.nodes.push(root);
        NodeId(0)
    }

    pub fn insert(&mut self, node: Node<S>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node<S> {
        self.nodes.get(id.index()).expect("invalid node id")
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        self.nodes.get_mut(id.index()).expect("invalid node id")
    }
}

impl<S> Default for NodeArena<S> {
    fn default() -> Self {
        Self::new()
    }
}
