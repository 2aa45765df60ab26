//! The Nancy decision module: Dijkstra-style backward belief propagation
//! (spec §4.4.1) followed by prefix deep thinking (spec §4.4.2–4.4.3).

pub mod backup;
pub mod distribution;

use crate::search::closed_list::ClosedMap;
use crate::search::domain::{Cost, Domain};
use crate::search::node::{NodeArena, NodeId};
use distribution::{distribution_after_search, expected_minimum, prob_first_less, Normal};
use itertools::Itertools;
use std::cmp::Reverse;
use tracing::trace;

/// Best and second-best child of `node` by its nancy-frontier's f-hat,
/// tie-breaking on higher g (spec §4.4.2 step 1–2). Only children that are
/// actually `node`'s generated-tree children (not merely domain
/// successors) are considered.
fn best_children<D: Domain>(
    domain: &D,
    arena: &NodeArena<D::State>,
    closed: &ClosedMap<D::State>,
    node_id: NodeId,
) -> (Option<NodeId>, Option<NodeId>) {
    let ranked: Vec<(Cost, Reverse<Cost>, NodeId)> = domain
        .successors(&arena.get(node_id).state)
        .into_iter()
        .filter_map(|child_state| {
            let child_id = closed.get(&child_state)?;
            (arena.get(child_id).parent == node_id).then_some(child_id)
        })
        .map(|child_id| {
            let frontier = arena.get(arena.get(child_id).nancy_frontier);
            (frontier.f_hat(), Reverse(arena.get(child_id).g), child_id)
        })
        .sorted_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)))
        .collect();

    (ranked.first().map(|e| e.2), ranked.get(1).map(|e| e.2))
}

#[allow(clippy::too_many_arguments)]
fn dist<D: Domain>(
    arena: &NodeArena<D::State>,
    node_id: NodeId,
    tau: f64,
    lookahead: usize,
    average_delay_window: f64,
) -> Normal {
    distribution_after_search(arena, node_id, tau, lookahead, average_delay_window)
}

/// E[min(best child, second-best child)] of `node` at time fraction `tau`,
/// collapsing to a single mean/frontier value when fewer than two
/// generated-tree children exist (spec §4.4.3).
#[allow(clippy::too_many_arguments)]
fn expected_min_of_children<D: Domain>(
    domain: &D,
    arena: &NodeArena<D::State>,
    closed: &ClosedMap<D::State>,
    node_id: NodeId,
    tau: f64,
    lookahead: usize,
    average_delay_window: f64,
) -> f64 {
    match best_children(domain, arena, closed, node_id) {
        (Some(a), Some(b)) => expected_minimum(
            dist(arena, a, tau, lookahead, average_delay_window),
            dist(arena, b, tau, lookahead, average_delay_window),
        ),
        (Some(a), None) => dist(arena, a, tau, lookahead, average_delay_window).mean,
        (None, _) => {
            let frontier = arena.get(node_id).nancy_frontier;
            arena.get(frontier).f_hat().into_inner()
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn p_alpha<D: Domain>(
    arena: &NodeArena<D::State>,
    alpha_id: NodeId,
    beta_id: NodeId,
    tau: f64,
    lookahead: usize,
    average_delay_window: f64,
) -> f64 {
    prob_first_less(
        dist(arena, alpha_id, tau, lookahead, average_delay_window),
        dist(arena, beta_id, tau, lookahead, average_delay_window),
    )
}

/// Decide whether `cur` (at virtual time step `t`) should commit to its
/// best child. Returns the child to commit to, if any (spec §4.4.2 steps
/// 1–6).
#[allow(clippy::too_many_arguments)]
fn decide<D: Domain>(
    domain: &D,
    arena: &NodeArena<D::State>,
    closed: &ClosedMap<D::State>,
    cur: NodeId,
    t: u32,
    lookahead: usize,
    average_delay_window: f64,
) -> Option<NodeId> {
    let (alpha, beta) = best_children(domain, arena, closed, cur);
    let alpha = alpha?;

    let Some(beta) = beta else {
        // Sole child with a generated frontier: commit unconditionally.
        return Some(alpha);
    };

    let half_t = t as f64 / 2.0;
    let pa = p_alpha(arena, alpha, beta, half_t, lookahead, average_delay_window);
    if pa >= 1.0 {
        return Some(alpha);
    }

    let commit_tau = (t as f64 + 1.0) / 2.0;
    let commit_utility =
        expected_min_of_children(domain, arena, closed, alpha, commit_tau, lookahead, average_delay_window);

    let not_commit_tau = (half_t + 1.0) / 2.0;
    let utility_of_alpha =
        expected_min_of_children(domain, arena, closed, alpha, not_commit_tau, lookahead, average_delay_window);
    let utility_of_beta =
        expected_min_of_children(domain, arena, closed, beta, not_commit_tau, lookahead, average_delay_window);
    let not_commit_utility = pa * utility_of_alpha + (1.0 - pa) * utility_of_beta;

    trace!(commit_utility, not_commit_utility, t, "nancy: prefix decision");

    if not_commit_utility >= commit_utility {
        None
    } else {
        Some(alpha)
    }
}

/// Walk forward from `start` committing successive best children as long
/// as `decide` says so (spec §4.4.2). Returns the commit stack with the
/// root-nearest committed node last (see spec §5 "Ordering guarantees").
fn prefix_deep_thinking<D: Domain>(
    domain: &D,
    arena: &NodeArena<D::State>,
    closed: &ClosedMap<D::State>,
    start: NodeId,
    lookahead: usize,
    average_delay_window: f64,
) -> Vec<NodeId> {
    let mut committed = Vec::new();
    let mut cur = start;
    let mut t = 1u32;

    while let Some(alpha) = decide(domain, arena, closed, cur, t, lookahead, average_delay_window) {
        committed.push(alpha);
        cur = alpha;
        t += 1;
    }

    committed.reverse();
    committed
}

/// Entry point for the Nancy decision module (spec §4.4): runs the backup,
/// then prefix deep thinking, honoring `force_commit`.
#[allow(clippy::too_many_arguments)]
pub fn nancy_backup<D: Domain>(
    domain: &D,
    arena: &mut NodeArena<D::State>,
    open: &crate::search::open_list::OpenList,
    closed: &ClosedMap<D::State>,
    start: NodeId,
    lookahead: usize,
    force_commit: bool,
) -> Vec<NodeId> {
    backup::dijkstra_nancy_backup(domain, arena, open, closed);

    let average_delay_window = domain.average_delay_window();
    let mut committed = prefix_deep_thinking(domain, arena, closed, start, lookahead, average_delay_window);

    if committed.is_empty() && force_commit {
        if let (Some(alpha), _) = best_children(domain, arena, closed, start) {
            committed.push(alpha);
        }
    }

    committed
}
