//! The driver (spec §4.1): orchestrates expansion, decision, and learning
//! around an action queue and a result accumulator.

use crate::search::closed_list::ClosedMap;
use crate::search::decision::{self, DecisionModuleName};
use crate::search::domain::{Cost, Domain};
use crate::search::expansion;
use crate::search::node::{Node, NodeArena, NO_NODE};
use crate::search::open_list::{Comparator, OpenList};
use crate::search::result::SearchResult;
use clap::ValueEnum;
use std::collections::VecDeque;
use tracing::{info, info_span};

/// Selects the comparator the expansion module sorts OPEN by (spec §6
/// "Core interface", expansionModule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExpansionModuleName {
    #[value(help = "Sort OPEN by f = g + h")]
    Astar,
    #[value(name = "fhat", help = "Sort OPEN by f-hat = g + h-hat")]
    FHat,
}

impl ExpansionModuleName {
    fn comparator(self) -> Comparator {
        match self {
            ExpansionModuleName::Astar => Comparator::F,
            ExpansionModuleName::FHat => Comparator::FHat,
        }
    }
}

/// A committed-but-not-yet-"executed" action. Carries just enough to pay
/// for it later: the state it arrives at, and the cost of the edge that
/// arrives there. Node identities don't survive past the iteration that
/// created them (OPEN/CLOSED's arena is rebuilt every iteration), so the
/// action queue holds domain-level facts rather than `NodeId`s.
#[derive(Debug, Clone)]
struct ActionQueueEntry<S> {
    state: S,
    edge_cost: Cost,
}

/// The core (spec §6 "Core interface"): construct once per run, then call
/// [`Driver::search`].
pub struct Driver<D: Domain> {
    domain: D,
    expansion_module: ExpansionModuleName,
    decision_module: DecisionModuleName,
    lookahead: usize,
}

impl<D: Domain> Driver<D> {
    /// Panics (configuration error, spec §7) if `lookahead < 2`.
    pub fn new(
        domain: D,
        expansion_module: ExpansionModuleName,
        decision_module: DecisionModuleName,
        lookahead: usize,
    ) -> Self {
        assert!(lookahead >= 2, "lookahead must be at least 2, got {lookahead}");
        Self {
            domain,
            expansion_module,
            decision_module,
            lookahead,
        }
    }

    /// Copies the domain's final global epsilon averages into the result
    /// (spec SPEC_FULL.md §11 "epsilonHGlobal/epsilonDGlobal result fields").
    fn snapshot_epsilons(&self, result: &mut SearchResult) {
        result.epsilon_h_global = self.domain.epsilon_h_global();
        result.epsilon_d_global = self.domain.epsilon_d_global();
    }

    pub fn search(mut self) -> SearchResult {
        let mut result = SearchResult::new();
        result.solution_cost = Cost::from(0.0);

        let mut lookahead = self.lookahead;
        // Holds only genuinely committed-but-unexecuted edges. `start_state`
        // is the source of truth for the agent's position; it is kept in
        // sync with the queue's front whenever the queue is non-empty, and
        // otherwise carries forward unchanged (true only before the very
        // first commit).
        let mut action_queue: VecDeque<ActionQueueEntry<D::State>> = VecDeque::new();
        let mut start_state = self.domain.start_state();

        let mut arena: NodeArena<D::State> = NodeArena::new();
        let mut open = OpenList::new(self.expansion_module.comparator());
        let mut closed: ClosedMap<D::State> = ClosedMap::new();

        // Once a goal has been seen at OPEN's top, every *subsequent*
        // decision for the rest of this run is forced to "alltheway" (spec
        // §4.1 step 5: "force subsequent decisions to alltheway"), not just
        // the one `decision::backup` call that first saw it. Without this,
        // a later iteration's top-of-loop queue handling would still drain
        // the queue under the originally configured module (e.g. peek-only
        // for "one"/"dtrts"), leaving the already-fully-committed
        // prefix-to-goal sitting unconsumed and re-searched from its
        // interior, corrupting the action queue with stale, non-adjacent
        // entries.
        let mut goal_forced = false;

        let mut iteration = 0u64;
        loop {
            let span = info_span!("iteration", iteration);
            let _enter = span.enter();

            // Whether this iteration's multi-step drain already recorded a
            // `paths` entry that accounts for `start_state`'s arrival — if
            // so, the goal check below must charge any remaining queued
            // cost without recording a second, redundant entry for the
            // same arrival.
            let mut path_already_recorded = false;

            // A goal forced earlier in the run makes every remaining
            // decision cycle behave as multi-step, regardless of the
            // originally configured module: the queue now holds an entire
            // committed prefix-to-goal that must be drained as a unit.
            let multi_step_now = goal_forced || self.decision_module.is_multi_step();

            if !multi_step_now {
                if let Some(front) = action_queue.front() {
                    start_state = front.state.clone();
                }
            } else {
                let mut current_path = Vec::new();
                let mut goal_reached = false;
                while action_queue.len() > 1 {
                    let entry = action_queue.pop_front().expect("checked len > 1");
                    current_path.push(entry.state.to_string());
                    result.solution_cost += entry.edge_cost;
                    result.solution_length += 1;
                    result.gat_nodes_expanded += lookahead as u64;

                    if self.domain.is_goal(&entry.state) {
                        goal_reached = true;
                        break;
                    }
                }
                if goal_reached {
                    if !current_path.is_empty() {
                        result.is_keep_thinking_flags.push(false);
                        result.paths.push(current_path);
                    }
                    result.solution_found = true;
                    self.snapshot_epsilons(&mut result);
                    return result;
                }
                if let Some(front) = action_queue.front() {
                    if !current_path.is_empty() {
                        current_path.push(front.state.to_string());
                        result.is_keep_thinking_flags.push(false);
                        result.paths.push(current_path);
                        path_already_recorded = true;
                    }
                    start_state = front.state.clone();
                }
            }

            if self.domain.is_goal(&start_state) {
                // If the queue is empty, `start_state` was never a
                // committed edge (the agent started at the goal); nothing
                // to charge. Otherwise its front is exactly `start_state`,
                // a real traversed edge, charged here for the first time.
                let mut flushed = vec![start_state.to_string()];
                if let Some(front_entry) = action_queue.pop_front() {
                    result.solution_cost += front_entry.edge_cost;
                    result.solution_length += 1;
                    while let Some(entry) = action_queue.pop_front() {
                        result.solution_cost += entry.edge_cost;
                        result.solution_length += 1;
                        flushed.push(entry.state.to_string());
                    }
                }
                if !path_already_recorded {
                    result.is_keep_thinking_flags.push(false);
                    result.paths.push(flushed);
                }
                result.solution_found = true;
                self.snapshot_epsilons(&mut result);
                return result;
            }

            let root = Node {
                g: Cost::from(0.0),
                h: self.domain.heuristic(&start_state),
                d: self.domain.distance(&start_state),
                derr: self.domain.distance_err(&start_state),
                eps_h: self.domain.epsilon_h_global(),
                eps_d: self.domain.epsilon_d_global(),
                expansion_counter: 0,
                parent: NO_NODE,
                open: true,
                delay_cntr: 0,
                backup_h_hat: Cost::from(f64::INFINITY),
                nancy_frontier: NO_NODE,
                state: start_state.clone(),
            };
            closed.clear();
            let start_id = arena.reset_with_root(root);
            open.clear();
            open.push(start_id, &arena);
            self.domain.update_epsilons();

            let mut commit_stack = Vec::new();
            let mut deadend = false;
            loop {
                expansion::expand(
                    &mut self.domain,
                    &mut arena,
                    &mut open,
                    &mut closed,
                    lookahead,
                    self.expansion_module.comparator(),
                    &mut result,
                );

                if open.is_empty() {
                    deadend = true;
                    break;
                }

                goal_forced = goal_forced || self.domain.is_goal(&arena.get(open.peek_top().unwrap()).state);
                let effective_module = if goal_forced {
                    DecisionModuleName::AllTheWay
                } else {
                    self.decision_module
                };

                commit_stack = decision::backup(
                    effective_module,
                    &self.domain,
                    &mut arena,
                    &open,
                    &closed,
                    start_id,
                    lookahead,
                    false,
                );

                // One action-queue entry is consumed every pass of this
                // loop, whether or not this pass produced a commit: time
                // advances regardless (spec §9 open question, resolved in
                // favor of the source's literal behavior).
                if let Some(entry) = action_queue.pop_front() {
                    result.solution_cost += entry.edge_cost;
                    result.solution_length += 1;
                    if !effective_module.is_multi_step() {
                        result.is_keep_thinking_flags.push(commit_stack.is_empty());
                        result.paths.push(vec![entry.state.to_string()]);
                    }
                }

                if !commit_stack.is_empty() || action_queue.is_empty() {
                    break;
                }
            }

            if deadend {
                result.solution_found = false;
                result.solution_cost = Cost::from(-1.0);
                info!("driver: deadend, no solution");
                self.snapshot_epsilons(&mut result);
                return result;
            }

            if commit_stack.is_empty() {
                let effective_module = if goal_forced {
                    DecisionModuleName::AllTheWay
                } else {
                    self.decision_module
                };
                commit_stack = decision::backup(
                    effective_module,
                    &self.domain,
                    &mut arena,
                    &open,
                    &closed,
                    start_id,
                    lookahead,
                    true,
                );
                assert!(
                    !commit_stack.is_empty(),
                    "forceCommit must return at least one node"
                );
            }

            if self.decision_module.is_dynamic_lookahead() {
                lookahead += self.lookahead * commit_stack.len();
            }

            let mut committed_states = Vec::new();
            while let Some(node_id) = commit_stack.pop() {
                let node = arena.get(node_id);
                let entry = ActionQueueEntry {
                    state: node.state.clone(),
                    edge_cost: self.domain.edge_cost(&node.state),
                };
                committed_states.push(entry.state.to_string());
                action_queue.push_back(entry);
            }
            result.committed.push(committed_states);

            crate::search::learning::learn(&mut self.domain, &mut arena, &mut open, &mut closed);

            iteration += 1;
        }
    }
}
