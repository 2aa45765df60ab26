//! Decision modules (spec §4.3–4.4): given an expanded region, decide how
//! many steps of the best discovered prefix the agent should commit to.

pub mod nancy;
pub mod scalar;

use crate::search::closed_list::ClosedMap;
use crate::search::domain::Domain;
use crate::search::node::{NodeArena, NodeId};
use crate::search::open_list::OpenList;
use clap::ValueEnum;

/// Selects which decision module backs a run, and how the driver should
/// treat the action queue and lookahead budget around it (spec §4.1, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecisionModuleName {
    #[value(help = "Scalar backup, commit one step per iteration")]
    One,
    #[value(name = "alltheway", help = "Scalar backup, commit the whole prefix every iteration")]
    AllTheWay,
    #[value(
        name = "dynamicLookahead",
        help = "Scalar backup, commit the whole prefix, grow lookahead by the size of each commit"
    )]
    DynamicLookahead,
    #[value(help = "Nancy backup with prefix deep thinking, commit one step")]
    Dtrts,
    #[value(help = "Nancy backup with prefix deep thinking, commit the whole prefix and grow lookahead")]
    Dydtrts,
}

impl DecisionModuleName {
    /// Whether the driver drains all but the last queued action before
    /// expanding (spec §4.1 step 2), rather than just peeking the front.
    pub fn is_multi_step(self) -> bool {
        matches!(
            self,
            DecisionModuleName::AllTheWay | DecisionModuleName::DynamicLookahead | DecisionModuleName::Dydtrts
        )
    }

    /// Whether committing should grow the expansion module's lookahead
    /// (spec §4.1 step 8, §4.2 "Dynamic lookahead").
    pub fn is_dynamic_lookahead(self) -> bool {
        matches!(self, DecisionModuleName::DynamicLookahead | DecisionModuleName::Dydtrts)
    }

    fn is_nancy(self) -> bool {
        matches!(self, DecisionModuleName::Dtrts | DecisionModuleName::Dydtrts)
    }
}

/// Dispatches to the scalar or Nancy backup depending on `module`
/// (spec §4.1 step 5's `decision.backup` call).
#[allow(clippy::too_many_arguments)]
pub fn backup<D: Domain>(
    module: DecisionModuleName,
    domain: &D,
    arena: &mut NodeArena<D::State>,
    open: &OpenList,
    closed: &ClosedMap<D::State>,
    start: NodeId,
    lookahead: usize,
    force_commit: bool,
) -> Vec<NodeId> {
    if module.is_nancy() {
        nancy::nancy_backup(domain, arena, open, closed, start, lookahead, force_commit)
    } else {
        // `forceCommit` is ignored by scalar backup (spec §4.3): it always
        // commits at least one step on a non-empty OPEN.
        scalar::backup(open, arena, start, module.is_multi_step())
    }
}
