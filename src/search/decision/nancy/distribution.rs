//! Gaussian beliefs over post-search solution cost, and the closed-form
//! utilities the Nancy decision module needs (spec §4.4.3).
//!
//! The open questions spec §9 raises are both resolved here in favor of
//! the "standard" forms: the variance uses `min(1, ds/d)` (not
//! `1 - min(1, ds/d)`), and the expected minimum uses `Φ(-x)` for the
//! second term (not `Φ(x)` again).

use crate::search::node::{NodeArena, NodeId};

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// A normal belief over a solution's remaining cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    pub mean: f64,
    pub var: f64,
}

/// Abramowitz & Stegun 7.1.26 approximation of the error function (max
/// absolute error ~1.5e-7); the standard library has no `erf`.
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF, Φ.
fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Standard normal PDF, φ.
fn standard_normal_pdf(x: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

fn theta(d1: Normal, d2: Normal) -> f64 {
    let sum = d1.var + d2.var;
    if sum <= 0.0 {
        0.0
    } else {
        sum.sqrt()
    }
}

/// E[min(d1, d2)] in closed form.
pub fn expected_minimum(d1: Normal, d2: Normal) -> f64 {
    if d1.var < 0.01 && d2.var < 0.01 {
        return d1.mean.min(d2.mean);
    }
    let theta = theta(d1, d2);
    if theta == 0.0 {
        return d1.mean.min(d2.mean);
    }
    let x = (d1.mean - d2.mean) / theta;
    d1.mean * standard_normal_cdf(x) + d2.mean * standard_normal_cdf(-x)
        - theta * standard_normal_pdf(x)
}

/// P(d1 < d2).
pub fn prob_first_less(d1: Normal, d2: Normal) -> f64 {
    let theta = theta(d1, d2);
    if theta == 0.0 {
        return if d1.mean <= d2.mean { 1.0 } else { 0.0 };
    }
    standard_normal_cdf((d2.mean - d1.mean) / theta)
}

/// The belief over `node`'s post-additional-search cost at virtual time
/// fraction `tau`, derived from `node.nancy_frontier` (spec §4.4.3).
pub fn distribution_after_search<S>(
    arena: &NodeArena<S>,
    node_id: NodeId,
    tau: f64,
    lookahead: usize,
    average_delay_window: f64,
) -> Normal {
    let node = arena.get(node_id);
    let frontier = arena.get(node.nancy_frontier);
    let mean = frontier.f_hat().into_inner();
    let d = frontier.d.into_inner();

    if d <= 0.0 {
        return Normal { mean, var: 0.0 };
    }

    let ds = tau * lookahead as f64 / average_delay_window;
    let var = (frontier.eps_h * d).powi(2) * (ds / d).min(1.0);
    Normal { mean, var: var.max(0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::domain::Cost;
    use crate::search::node::{Node, NodeArena, NO_NODE};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn expected_minimum_collapses_to_min_when_variances_are_tiny() {
        let a = Normal { mean: 3.0, var: 0.0 };
        let b = Normal { mean: 5.0, var: 0.0 };
        assert_approx_eq!(expected_minimum(a, b), 3.0);
    }

    #[test]
    fn expected_minimum_of_identical_beliefs_is_below_either_mean() {
        // symmetric beliefs: E[min] < mean by exactly theta/sqrt(pi)
        let a = Normal { mean: 10.0, var: 4.0 };
        let b = Normal { mean: 10.0, var: 4.0 };
        let m = expected_minimum(a, b);
        assert!(m < 10.0);
        let theta = (8.0_f64).sqrt();
        assert_approx_eq!(m, 10.0 - theta / std::f64::consts::PI.sqrt(), 1e-6);
    }

    #[test]
    fn prob_first_less_is_half_for_identical_beliefs() {
        let a = Normal { mean: 1.0, var: 1.0 };
        let b = Normal { mean: 1.0, var: 1.0 };
        assert_approx_eq!(prob_first_less(a, b), 0.5);
    }

    #[test]
    fn prob_first_less_favors_the_smaller_mean() {
        let a = Normal { mean: 1.0, var: 1.0 };
        let b = Normal { mean: 5.0, var: 1.0 };
        assert!(prob_first_less(a, b) > 0.5);
    }

    #[test]
    fn distribution_after_search_uses_frontiers_f_hat_and_scales_variance_with_tau() {
        let mut arena: NodeArena<u32> = NodeArena::new();
        let frontier = Node {
            g: Cost::from(2.0),
            h: Cost::from(3.0),
            d: Cost::from(4.0),
            derr: Cost::from(0.0),
            eps_h: 0.5,
            eps_d: 0.0,
            expansion_counter: 10,
            parent: NO_NODE,
            open: true,
            delay_cntr: 0,
            backup_h_hat: Cost::from(f64::INFINITY),
            nancy_frontier: NO_NODE,
            state: 1,
        };
        let frontier_id = arena.insert(frontier);
        let node = Node {
            g: Cost::from(0.0),
            h: Cost::from(0.0),
            d: Cost::from(0.0),
            derr: Cost::from(0.0),
            eps_h: 0.0,
            eps_d: 0.0,
            expansion_counter: 0,
            parent: NO_NODE,
            open: true,
            delay_cntr: 0,
            backup_h_hat: Cost::from(f64::INFINITY),
            nancy_frontier: frontier_id,
            state: 0,
        };
        let node_id = arena.insert(node);

        let at_zero = distribution_after_search(&arena, node_id, 0.0, 10, 1.0);
        assert_approx_eq!(at_zero.mean, 5.0); // f_hat = g + h_hat, h_hat = h since eps_d = 0
        assert_approx_eq!(at_zero.var, 0.0);

        let at_full = distribution_after_search(&arena, node_id, 1.0, 10, 1.0);
        // ds = 1 * 10 / 1.0 = 10 >= d = 4, so min(1, ds/d) saturates at 1
        assert_approx_eq!(at_full.var, (0.5_f64 * 4.0).powi(2));
    }
}
