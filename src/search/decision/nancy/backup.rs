//! Dijkstra-style Nancy backup (spec §4.4.1): propagate a belief (mean
//! encoded as `f_hat`, frontier pointer) from OPEN backward over the
//! generated tree.

use crate::search::closed_list::ClosedMap;
use crate::search::domain::{Cost, Domain};
use crate::search::node::NodeArena;
use crate::search::open_list::{Comparator, OpenList};
use tracing::trace;

/// Runs the backward propagation on a private copy of OPEN/CLOSED's
/// bookkeeping structures (spec design note "Copy semantics in Nancy
/// backup") so the driver's real OPEN/CLOSED survive untouched for the
/// later learning pass. The underlying [`crate::search::node::Node`]s are
/// not copied: `backup_h_hat`/`nancy_frontier` are transient fields meant
/// to be rewritten by every call.
pub fn dijkstra_nancy_backup<D: Domain>(
    domain: &D,
    arena: &mut NodeArena<D::State>,
    open: &OpenList,
    closed: &ClosedMap<D::State>,
) {
    let mut local_closed = closed.clone();

    for id in local_closed.values().collect::<Vec<_>>() {
        arena.get_mut(id).backup_h_hat = Cost::from(f64::INFINITY);
    }

    let mut local_open = OpenList::new(Comparator::BackupHHat);
    for id in open.iter_ids() {
        let node = arena.get_mut(id);
        node.backup_h_hat = node.h_hat();
        node.nancy_frontier = id;
        local_open.push(id, arena);
    }

    while !local_open.is_empty() {
        let Some(cur_id) = local_open.pop_top() else {
            break;
        };
        let cur_state = arena.get(cur_id).state.clone();
        local_closed.remove(&cur_state);

        let cur_backup_h_hat = arena.get(cur_id).backup_h_hat;
        let cur_frontier = arena.get(cur_id).nancy_frontier;

        for pred_state in domain.predecessors(&cur_state) {
            let Some(parent_id) = local_closed.get(&pred_state) else {
                continue;
            };
            if arena.get(cur_id).parent != parent_id {
                continue;
            }

            let edge_cost = domain.edge_cost(&cur_state);
            let candidate = edge_cost + cur_backup_h_hat;
            if candidate >= arena.get(parent_id).backup_h_hat {
                continue;
            }

            arena.get_mut(parent_id).backup_h_hat = candidate;
            arena.get_mut(parent_id).nancy_frontier = cur_frontier;

            if local_open.contains(parent_id) {
                local_open.update(parent_id, arena);
            } else {
                local_open.push(parent_id, arena);
            }
        }
        trace!("nancy backup: settled a node");
    }

    // Anything left in `local_closed` was never reached from OPEN through
    // the generated tree: a deadend.
    for id in local_closed.values().collect::<Vec<_>>() {
        let node = arena.get_mut(id);
        node.h = Cost::from(f64::INFINITY);
        node.d = Cost::from(f64::INFINITY);
        node.derr = Cost::from(f64::INFINITY);
        node.eps_h = 0.0;
        node.eps_d = 0.0;
        node.nancy_frontier = id;
    }
}
