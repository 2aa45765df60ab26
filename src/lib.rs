#![warn(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unit_bindings)]
#![warn(unused_qualifications)]

//! A real-time heuristic search engine: bounded-lookahead best-first
//! expansion, Nancy-style distributional backup, prefix commitment, and
//! Dijkstra learning, generic over an abstract search domain.

pub mod search;

#[cfg(test)]
mod test_support;
