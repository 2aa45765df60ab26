//! The Dijkstra learning module (spec §4.5): a reverse Dijkstra over CLOSED
//! from OPEN that raises the heuristic of interior states whose previously
//! optimistic estimate is dominated by a bootstrapped neighbor.

use crate::search::closed_list::ClosedMap;
use crate::search::domain::{Cost, Domain};
use crate::search::node::NodeArena;
use crate::search::open_list::{Comparator, OpenList};
use tracing::trace;

/// Runs directly on the driver's own OPEN/CLOSED — unlike the Nancy backup,
/// nothing here needs to survive past this call, since both are reset at
/// the top of the next iteration anyway.
pub fn learn<D: Domain>(
    domain: &mut D,
    arena: &mut NodeArena<D::State>,
    open: &mut OpenList,
    closed: &mut ClosedMap<D::State>,
) {
    for id in closed.values().collect::<Vec<_>>() {
        if !arena.get(id).open {
            let state = arena.get(id).state.clone();
            domain.update_heuristic(&state, Cost::from(f64::INFINITY));
        }
    }

    open.swap_comparator(Comparator::HHat, arena);

    while !open.is_empty() && !closed.is_empty() {
        let Some(cur_id) = open.pop_top() else {
            break;
        };
        let cur_state = arena.get(cur_id).state.clone();
        closed.remove(&cur_state);

        let cur_edge_cost = domain.edge_cost(&cur_state);
        let cur_h = domain.heuristic(&cur_state);
        let cur_d = domain.distance(&cur_state);
        let cur_derr = domain.distance_err(&cur_state);
        let cur_eps_h = arena.get(cur_id).eps_h;
        let cur_eps_d = arena.get(cur_id).eps_d;
        let bootstrapped_h = cur_edge_cost + cur_h;

        for pred_state in domain.predecessors(&cur_state) {
            let Some(pred_id) = closed.get(&pred_state) else {
                continue;
            };
            if arena.get(cur_id).parent != pred_id {
                continue;
            }
            if domain.heuristic(&pred_state) <= bootstrapped_h {
                continue;
            }

            domain.update_heuristic(&pred_state, bootstrapped_h);
            domain.update_distance(&pred_state, cur_d + Cost::from(1.0));
            domain.update_distance_err(&pred_state, cur_derr);

            let node = arena.get_mut(pred_id);
            node.h = bootstrapped_h;
            node.d = cur_d + Cost::from(1.0);
            node.derr = cur_derr;
            node.eps_h = cur_eps_h;
            node.eps_d = cur_eps_d;

            if open.contains(pred_id) {
                open.update(pred_id, arena);
            } else {
                open.push(pred_id, arena);
            }
            trace!(%pred_state, h = bootstrapped_h.into_inner(), "learning: raised heuristic");
        }
    }
}
