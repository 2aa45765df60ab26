//! The scalar decision module (spec §4.3): walk the parent chain from
//! OPEN's best node back to `start`, committing either just the first step
//! or the whole prefix.

use crate::search::node::{NodeArena, NodeId};
use crate::search::open_list::OpenList;

/// Returns the commit stack, root-nearest node last (so the driver's
/// `pop()` sees it first — see spec §5 "Ordering guarantees").
///
/// `forceCommit` is deliberately not a parameter: the scalar backup always
/// commits at least one step, per spec §4.3.
pub fn backup<S>(open: &OpenList, arena: &NodeArena<S>, start_id: NodeId, multi_step: bool) -> Vec<NodeId> {
    let mut goal_prime = open
        .peek_top()
        .expect("scalar backup requires a non-empty OPEN");
    let mut stack = Vec::new();

    while arena.get(goal_prime).parent != start_id {
        if multi_step {
            stack.push(goal_prime);
        }
        goal_prime = arena.get(goal_prime).parent;
        debug_assert_ne!(
            goal_prime,
            crate::search::node::NO_NODE,
            "parent chain from OPEN's top must reach start"
        );
    }

    stack.push(goal_prime);
    stack
}
