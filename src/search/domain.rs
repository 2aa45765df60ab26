//! The abstract domain interface the core is generic over. Concrete
//! problem domains (grid pathfinding, sliding-tile puzzles, ...) are
//! external collaborators; the core only ever talks to a type implementing
//! [`Domain`].

use ordered_float::OrderedFloat;
use std::fmt::Display;
use std::hash::Hash;

/// Cost type used throughout the search: a totally-ordered `f64` with a
/// well-defined `+infinity`.
pub type Cost = OrderedFloat<f64>;

/// A deterministic search domain with non-negative edge costs and a cached,
/// mutable heuristic/distance model. The domain is mutated by the core
/// (learning writes back into its heuristic/distance cache; expansion
/// writes into its delay window and global epsilon streams) but is never
/// touched by more than one core component at a time (see spec §5).
pub trait Domain {
    /// A state in the domain's state graph.
    type State: Clone + Eq + Hash + Display;

    /// The state the agent starts an entire run from.
    fn start_state(&self) -> Self::State;

    /// Whether `state` satisfies the goal predicate.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Memoized cost-to-go estimate.
    fn heuristic(&self, state: &Self::State) -> Cost;
    /// Memoized steps-to-go estimate.
    fn distance(&self, state: &Self::State) -> Cost;
    /// Memoized second steps-to-go estimate, used for error accumulation.
    fn distance_err(&self, state: &Self::State) -> Cost;

    /// Overwrite the cached heuristic for `state`. Used only by the
    /// learning module.
    fn update_heuristic(&mut self, state: &Self::State, value: Cost);
    /// Overwrite the cached distance for `state`. Used only by the
    /// learning module.
    fn update_distance(&mut self, state: &Self::State, value: Cost);
    /// Overwrite the cached distance-error for `state`. Used only by the
    /// learning module.
    fn update_distance_err(&mut self, state: &Self::State, value: Cost);

    /// All states reachable from `state` in one edge, in a fixed order.
    fn successors(&self, state: &Self::State) -> Vec<Self::State>;
    /// All states from which `state` is reachable in one edge. May be
    /// empty until `successors` has been called on the neighbor.
    fn predecessors(&self, state: &Self::State) -> Vec<Self::State>;
    /// Cost of the edge arriving at `state`.
    fn edge_cost(&self, state: &Self::State) -> Cost;

    /// Record one more expansion-delay sample.
    fn push_delay_window(&mut self, delay: u32);
    /// Running mean over the bounded delay window; `1.0` when empty.
    fn average_delay_window(&self) -> f64;

    /// Global one-step heuristic error average, used only by decision
    /// module variants that do not use path-based epsilons.
    fn epsilon_h_global(&self) -> f64;
    /// Global one-step distance error average, used only by decision
    /// module variants that do not use path-based epsilons.
    fn epsilon_d_global(&self) -> f64;
    /// Push a one-step heuristic error residual into the global average.
    fn push_epsilon_h_global(&mut self, value: f64);
    /// Push a one-step distance error residual into the global average.
    fn push_epsilon_d_global(&mut self, value: f64);
    /// Recompute any derived epsilon state (called once per iteration by
    /// the driver, mirroring the original implementation's per-iteration
    /// `updateEpsilons` hook).
    fn update_epsilons(&mut self);
}
