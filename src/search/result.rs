//! The diagnostic record returned by a full [`crate::search::driver::Driver::search`]
//! run (spec §6 "Result record").

use crate::search::domain::Cost;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub solution_found: bool,
    pub solution_cost: Cost,
    pub solution_length: i64,
    pub nodes_generated: u64,
    pub nodes_expanded: u64,
    /// Goal-achievement time, in expansion ticks, including ticks "spent"
    /// during already-committed execution (spec glossary "GAT").
    pub gat_nodes_expanded: u64,
    /// One entry per committed prefix: the state-string trace of that
    /// prefix, in execution order.
    pub paths: Vec<Vec<String>>,
    /// One entry per expansion call: the states expanded during that call.
    pub visited: Vec<Vec<String>>,
    /// One entry per decision cycle: the states committed that cycle.
    pub committed: Vec<Vec<String>>,
    /// Parallel to `paths`: whether that entry was a defer-commit
    /// ("keep thinking") step rather than an executed commitment.
    pub is_keep_thinking_flags: Vec<bool>,
    /// Final global one-step heuristic error average (supplements spec
    /// §6; see SPEC_FULL.md §11).
    pub epsilon_h_global: f64,
    /// Final global one-step distance error average (see SPEC_FULL.md §11).
    pub epsilon_d_global: f64,
}

impl SearchResult {
    pub fn new() -> Self {
        Self {
            solution_found: false,
            solution_cost: Cost::from(-1.0),
            solution_length: 0,
            nodes_generated: 0,
            nodes_expanded: 0,
            gat_nodes_expanded: 0,
            paths: Vec::new(),
            visited: Vec::new(),
            committed: Vec::new(),
            is_keep_thinking_flags: Vec::new(),
            epsilon_h_global: 0.0,
            epsilon_d_global: 0.0,
        }
    }

    pub fn increment_expanded_nodes(&mut self) {
        self.nodes_expanded += 1;
    }

    pub fn increment_generated_nodes(&mut self, n: usize) {
        self.nodes_generated += n as u64;
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::new()
    }
}
