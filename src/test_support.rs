//! A 4-connected grid-pathfinding domain used only to exercise the core
//! against [`crate::search::Domain`], grounded on
//! `examples/original_source/src/domain/GridPathfinding.h`. This is test
//! fixture, not a shipped concrete domain (spec.md §1 explicitly excludes
//! concrete problem domains from the library surface).

use crate::search::{Cost, Domain};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// A cell in the grid. Plain `(x, y)` coordinates, signed so that
/// off-the-edge moves can be checked before converting back to a legal
/// position, mirroring `GridPathfinding::isLegalLocation`'s `int` cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i64,
    pub y: i64,
}

impl Pos {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

const DELAY_WINDOW_CAP: usize = 20;

/// Installs a `tracing-subscriber` `fmt` subscriber gated by `RUST_LOG`, for
/// tests that want to eyeball the driver/expansion/learning log output
/// (spec.md §10.1). Safe to call from multiple tests: later calls are no-ops.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A 4-connected grid with unit edge costs and a Euclidean-distance
/// heuristic, identical in spirit to `GridPathfinding`: `heuristic`,
/// `distance` and `distanceErr` are all seeded from the same
/// straight-line estimate and memoized per state, `successors` records
/// the predecessor table lazily as it discovers edges.
#[derive(Debug)]
pub struct GridDomain {
    width: i64,
    height: i64,
    blocked: HashSet<Pos>,
    start: Pos,
    goal: Pos,
    heuristic: RefCell<HashMap<Pos, Cost>>,
    distance: RefCell<HashMap<Pos, Cost>>,
    distance_err: RefCell<HashMap<Pos, Cost>>,
    predecessors: RefCell<HashMap<Pos, Vec<Pos>>>,
    delay_window: RefCell<VecDeque<u32>>,
    eps_h_sum: f64,
    eps_h_count: u32,
    eps_d_sum: f64,
    eps_d_count: u32,
    eps_h_global: f64,
    eps_d_global: f64,
}

impl GridDomain {
    pub fn new(width: i64, height: i64, blocked: HashSet<Pos>, start: Pos, goal: Pos) -> Self {
        Self {
            width,
            height,
            blocked,
            start,
            goal,
            heuristic: RefCell::new(HashMap::new()),
            distance: RefCell::new(HashMap::new()),
            distance_err: RefCell::new(HashMap::new()),
            predecessors: RefCell::new(HashMap::new()),
            delay_window: RefCell::new(VecDeque::new()),
            eps_h_sum: 0.0,
            eps_h_count: 0,
            eps_d_sum: 0.0,
            eps_d_count: 0,
            eps_h_global: 0.0,
            eps_d_global: 0.0,
        }
    }

    /// A straight 1×n corridor, start at the left end, goal at the right.
    pub fn corridor(n: i64) -> Self {
        Self::new(n, 1, HashSet::new(), Pos::new(0, 0), Pos::new(n - 1, 0))
    }

    /// A single cell with no legal moves at all: any goal is unreachable.
    pub fn enclosed() -> Self {
        let mut blocked = HashSet::new();
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            blocked.insert(Pos::new(dx, dy));
        }
        Self::new(3, 3, blocked, Pos::new(1, 1), Pos::new(2, 2))
    }

    /// A 3×2 grid with a single wall at `(1, 0)`, forcing a detour from
    /// `(0, 0)` to `(2, 0)` via row `y = 1` (spec.md §8 scenario 5).
    pub fn wall_detour() -> Self {
        let mut blocked = HashSet::new();
        blocked.insert(Pos::new(1, 0));
        Self::new(3, 2, blocked, Pos::new(0, 0), Pos::new(2, 0))
    }

    fn euclidean_to_goal(&self, state: &Pos) -> Cost {
        let dx = (state.x - self.goal.x) as f64;
        let dy = (state.y - self.goal.y) as f64;
        Cost::from(dx.hypot(dy))
    }

    fn is_legal(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height && !self.blocked.contains(&Pos::new(x, y))
    }
}

impl Domain for GridDomain {
    type State = Pos;

    fn start_state(&self) -> Pos {
        self.start
    }

    fn is_goal(&self, state: &Pos) -> bool {
        *state == self.goal
    }

    fn heuristic(&self, state: &Pos) -> Cost {
        *self
            .heuristic
            .borrow_mut()
            .entry(*state)
            .or_insert_with(|| self.euclidean_to_goal(state))
    }

    fn distance(&self, state: &Pos) -> Cost {
        *self
            .distance
            .borrow_mut()
            .entry(*state)
            .or_insert_with(|| self.euclidean_to_goal(state))
    }

    fn distance_err(&self, state: &Pos) -> Cost {
        *self
            .distance_err
            .borrow_mut()
            .entry(*state)
            .or_insert_with(|| self.euclidean_to_goal(state))
    }

    fn update_heuristic(&mut self, state: &Pos, value: Cost) {
        self.heuristic.borrow_mut().insert(*state, value);
    }

    fn update_distance(&mut self, state: &Pos, value: Cost) {
        self.distance.borrow_mut().insert(*state, value);
    }

    fn update_distance_err(&mut self, state: &Pos, value: Cost) {
        self.distance_err.borrow_mut().insert(*state, value);
    }

    fn successors(&self, state: &Pos) -> Vec<Pos> {
        let mut successors = Vec::new();
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let (nx, ny) = (state.x + dx, state.y + dy);
            if self.is_legal(nx, ny) {
                successors.push(Pos::new(nx, ny));
            }
        }
        let mut predecessors = self.predecessors.borrow_mut();
        for succ in &successors {
            predecessors.entry(*succ).or_default().push(*state);
        }
        successors
    }

    fn predecessors(&self, state: &Pos) -> Vec<Pos> {
        self.predecessors.borrow().get(state).cloned().unwrap_or_default()
    }

    fn edge_cost(&self, _state: &Pos) -> Cost {
        Cost::from(1.0)
    }

    fn push_delay_window(&mut self, delay: u32) {
        let mut window = self.delay_window.borrow_mut();
        window.push_back(delay);
        if window.len() > DELAY_WINDOW_CAP {
            window.pop_front();
        }
    }

    fn average_delay_window(&self) -> f64 {
        let window = self.delay_window.borrow();
        if window.is_empty() {
            1.0
        } else {
            window.iter().sum::<u32>() as f64 / window.len() as f64
        }
    }

    fn epsilon_h_global(&self) -> f64 {
        self.eps_h_global
    }

    fn epsilon_d_global(&self) -> f64 {
        self.eps_d_global
    }

    fn push_epsilon_h_global(&mut self, value: f64) {
        self.eps_h_sum += value;
        self.eps_h_count += 1;
    }

    fn push_epsilon_d_global(&mut self, value: f64) {
        self.eps_d_sum += value;
        self.eps_d_count += 1;
    }

    fn update_epsilons(&mut self) {
        if self.eps_h_count > 0 {
            self.eps_h_global = self.eps_h_sum / self.eps_h_count as f64;
        }
        if self.eps_d_count > 0 {
            self.eps_d_global = self.eps_d_sum / self.eps_d_count as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_successors_stay_in_bounds() {
        let domain = GridDomain::corridor(5);
        assert_eq!(domain.successors(&Pos::new(0, 0)), vec![Pos::new(1, 0)]);
        assert_eq!(
            domain.successors(&Pos::new(2, 0)).into_iter().collect::<HashSet<_>>(),
            HashSet::from([Pos::new(3, 0), Pos::new(1, 0)])
        );
    }

    #[test]
    fn predecessors_are_recorded_lazily() {
        let domain = GridDomain::corridor(3);
        assert!(domain.predecessors(&Pos::new(1, 0)).is_empty());
        domain.successors(&Pos::new(0, 0));
        assert_eq!(domain.predecessors(&Pos::new(1, 0)), vec![Pos::new(0, 0)]);
    }

    #[test]
    fn enclosed_start_has_no_successors() {
        let domain = GridDomain::enclosed();
        assert!(domain.successors(&domain.start_state()).is_empty());
    }

    #[test]
    fn heuristic_is_memoized() {
        let domain = GridDomain::corridor(5);
        let first = domain.heuristic(&Pos::new(0, 0));
        assert_eq!(domain.heuristic(&Pos::new(0, 0)), first);
    }
}
