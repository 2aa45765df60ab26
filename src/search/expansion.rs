//! The bounded best-first expansion module (spec §4.2).

use crate::search::closed_list::ClosedMap;
use crate::search::domain::{Cost, Domain};
use crate::search::node::{Node, NodeArena, NodeId, NO_NODE};
use crate::search::open_list::{Comparator, OpenList};
use crate::search::result::SearchResult;
use tracing::{debug, trace};

/// Expand up to `lookahead - 1` nodes from OPEN in comparator order,
/// stopping early if OPEN's top is the goal (left on OPEN for the driver
/// to detect) or OPEN empties.
#[allow(clippy::too_many_arguments)]
pub fn expand<D: Domain>(
    domain: &mut D,
    arena: &mut NodeArena<D::State>,
    open: &mut OpenList,
    closed: &mut ClosedMap<D::State>,
    lookahead: usize,
    comparator: Comparator,
    result: &mut SearchResult,
) {
    open.swap_comparator(comparator, arena);
    debug!(?comparator, "expansion: comparator swapped");

    // Counting starts at 1: the root's own "expansion" to produce the
    // top-level successors is accounted for outside this call, so this
    // loop only ever performs up to `lookahead - 1` further expansions.
    let mut expansions = 1usize;
    let mut visited_this_call = Vec::new();

    while expansions < lookahead {
        let Some(cur_id) = open.peek_top() else {
            break;
        };

        let delay = arena.get(cur_id).delay_cntr;
        domain.push_delay_window(delay);

        if domain.is_goal(&arena.get(cur_id).state) {
            break;
        }

        open.pop_top();
        {
            let cur = arena.get_mut(cur_id);
            cur.open = false;
        }
        expansions += 1;
        result.increment_expanded_nodes();
        visited_this_call.push(arena.get(cur_id).state.to_string());

        for id in open.iter_ids().collect::<Vec<_>>() {
            arena.get_mut(id).delay_cntr += 1;
        }

        let cur_state = arena.get(cur_id).state.clone();
        let cur_g = arena.get(cur_id).g;
        let cur_h = arena.get(cur_id).h;
        let cur_d = arena.get(cur_id).d;
        let cur_eps_h = arena.get(cur_id).eps_h;
        let cur_eps_d = arena.get(cur_id).eps_d;
        let cur_expansion_counter = arena.get(cur_id).expansion_counter;

        let successors = domain.successors(&cur_state);
        result.increment_generated_nodes(successors.len());

        let mut added_children: Vec<NodeId> = Vec::new();
        let mut best_child_id: Option<NodeId> = None;
        let mut best_f = Cost::from(f64::INFINITY);

        for child_state in successors {
            let edge_cost = domain.edge_cost(&child_state);
            let candidate = Node {
                g: cur_g + edge_cost,
                h: domain.heuristic(&child_state),
                d: domain.distance(&child_state),
                derr: domain.distance_err(&child_state),
                eps_h: cur_eps_h,
                eps_d: cur_eps_d,
                expansion_counter: cur_expansion_counter,
                parent: cur_id,
                open: true,
                delay_cntr: 0,
                backup_h_hat: Cost::from(f64::INFINITY),
                nancy_frontier: NO_NODE,
                state: child_state,
            };

            if duplicate_detect(closed, arena, open, &candidate) {
                continue;
            }

            let f = candidate.f();
            let state = candidate.state.clone();
            let child_id = arena.insert(candidate);
            closed.insert(state, child_id);
            open.push(child_id, arena);
            added_children.push(child_id);

            if f < best_f {
                best_f = f;
                best_child_id = Some(child_id);
            }
        }

        if let Some(best_id) = best_child_id {
            let best_state = arena.get(best_id).state.clone();
            let eps_d_one = (1.0 + domain.distance(&best_state).into_inner()) - cur_d.into_inner();
            let eps_h_one = (domain.edge_cost(&best_state) + domain.heuristic(&best_state)).into_inner()
                - cur_h.into_inner();

            domain.push_epsilon_h_global(eps_h_one);
            domain.push_epsilon_d_global(eps_d_one);

            for child_id in added_children {
                arena.get_mut(child_id).push_path_based_epsilons(eps_h_one, eps_d_one);
                open.update(child_id, arena);
            }
        }

        trace!(expansions, "expansion: node expanded");
    }

    if !visited_this_call.is_empty() {
        result.visited.push(visited_this_call);
    }
}

fn duplicate_detect<D: Domain>(
    closed: &ClosedMap<D::State>,
    arena: &mut NodeArena<D::State>,
    open: &mut OpenList,
    candidate: &Node<D::State>,
) -> bool {
    let Some(existing_id) = closed.get(&candidate.state) else {
        return false;
    };

    let existing_open = arena.get(existing_id).open;
    if existing_open {
        if candidate.g < arena.get(existing_id).g {
            copy_fields(arena.get_mut(existing_id), candidate);
            open.update(existing_id, arena);
        }
    } else if candidate.f() < arena.get(existing_id).f() {
        copy_fields(arena.get_mut(existing_id), candidate);
        arena.get_mut(existing_id).open = true;
        open.push(existing_id, arena);
    }
    true
}

fn copy_fields<S: Clone>(existing: &mut Node<S>, candidate: &Node<S>) {
    existing.g = candidate.g;
    existing.parent = candidate.parent;
    existing.h = candidate.h;
    existing.d = candidate.d;
    existing.derr = candidate.derr;
    existing.eps_h = candidate.eps_h;
    existing.eps_d = candidate.eps_d;
    existing.state = candidate.state.clone();
}
