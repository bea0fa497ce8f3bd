//! Per-recursion pivot selection.
//!
//! For every block large enough to split, the driver asks for a pivot pair. Below the depth
//! gate the pair is chosen by a Nelder–Mead search over the space of order-statistic index
//! pairs, scored by executing the nested sort on a forked state and counting its ops. Past
//! the gate the deterministic (20th, 80th) percentiles are used.

use crate::{
    block::{Block, split, value},
    plot::{Plot, PlotSet},
    quicksort::quicksort_blk,
    state::State,
};

// CONSTANTS
// ================================================================================================

/// Cache slot sentinel; doubles as the infinite objective returned by the early exit.
const UNEVALUATED: usize = usize::MAX;

/// Nelder–Mead coefficients: reflection, expansion, contraction, shrink.
const ALPHA: f32 = 1.0;
const GAMMA: f32 = 2.0;
const RHO: f32 = 0.5;
const SIGMA: f32 = 0.5;

// PIVOT CONFIG
// ================================================================================================

/// Tuning knobs for the Nelder–Mead pivot search.
#[derive(Clone, Debug)]
pub struct PivotConfig {
    /// Nested-evaluation depth past which tuning falls back to percentile pivots.
    pub max_depth: usize,
    /// Iteration cap for the Nelder–Mead loop.
    pub max_iters: usize,
    /// Simplex L-infinity diameter below which the search stops.
    pub tol: f32,
    /// Edge length of the initial simplex in `[0, 1]` space.
    pub initial_scale: f32,
    /// Radius of the index-space neighborhood scanned around the converged vertex.
    pub final_radius: usize,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            max_iters: 50,
            tol: 0.01,
            initial_scale: 0.55,
            final_radius: 2,
        }
    }
}

// PIVOT SELECTION
// ================================================================================================

/// Returns the pivot pair `(p1, p2)`, `p1 <= p2`, for splitting `blk`.
pub(crate) fn pick_pivots(
    state: &State,
    blk: Block,
    cfg: &PivotConfig,
    plots: Option<&mut PlotSet>,
) -> (i32, i32) {
    let n = blk.size;
    let mut sorted: Vec<i32> = (0..n).map(|pos| value(state, blk.dest, pos)).collect();
    sorted.sort_unstable();

    if state.search_depth() > cfg.max_depth {
        return (sorted[20 * n / 100], sorted[80 * n / 100]);
    }

    let (i1, mut i2) = optimize_pivots(state, blk, &sorted, cfg, plots);
    // the upper pivot must exceed the block minimum, or the whole block would be routed to
    // one destination and the recursion would never shrink
    if n > 1 && i2 == 0 {
        i2 = 1;
    }
    (sorted[i1], sorted[i2])
}

// OBJECTIVE
// ================================================================================================

/// The tuning objective: op-count of the nested sort for a candidate index pair, memoized per
/// `optimize_pivots` call.
struct Objective<'a> {
    state: &'a State,
    blk: Block,
    sorted: &'a [i32],
    cfg: &'a PivotConfig,
    cache: Vec<usize>,
}

impl<'a> Objective<'a> {
    fn new(state: &'a State, blk: Block, sorted: &'a [i32], cfg: &'a PivotConfig) -> Self {
        let n = sorted.len();
        Self { state, blk, sorted, cfg, cache: vec![UNEVALUATED; n * n] }
    }

    /// Evaluates the index pair, forking the state, splitting at the corresponding order
    /// statistics and recursively sorting the pieces. Returns the fork's final op-count, or
    /// infinity if the current op-count already meets `best_cost`.
    fn eval(&mut self, (i1, i2): (usize, usize), best_cost: usize) -> usize {
        let n = self.sorted.len();
        debug_assert!(i1 <= i2 && i2 < n);

        if self.state.op_count() >= best_cost {
            return UNEVALUATED;
        }
        let key = i1 * n + i2;
        if self.cache[key] != UNEVALUATED {
            return self.cache[key];
        }

        let mut fork = self.state.fork();
        fork.increment_search_depth();
        let pieces = split(&mut fork, self.blk, self.sorted[i1], self.sorted[i2]);
        quicksort_blk(&mut fork, pieces.bot, self.cfg, None);
        quicksort_blk(&mut fork, pieces.mid, self.cfg, None);
        quicksort_blk(&mut fork, pieces.top, self.cfg, None);

        self.cache[key] = fork.op_count();
        self.cache[key]
    }
}

// NELDER-MEAD SEARCH
// ================================================================================================

/// Runs the Nelder–Mead search and the neighborhood refinement; returns the winning sorted
/// index pair `(i1, i2)` with `i1 <= i2 < n`.
pub(crate) fn optimize_pivots(
    state: &State,
    blk: Block,
    sorted: &[i32],
    cfg: &PivotConfig,
    plots: Option<&mut PlotSet>,
) -> (usize, usize) {
    let n = blk.size;
    if n <= 1 {
        return (0, 0);
    }

    let mut objective = Objective::new(state, blk, sorted, cfg);

    let base = [0.33f32, 0.5f32];
    let mut simplex = [
        base,
        [(base[0] + cfg.initial_scale).min(1.0), base[1]],
        [base[0], (base[1] + cfg.initial_scale).min(1.0)],
    ];
    let mut fvals = [UNEVALUATED; 3];
    for i in 0..3 {
        let best = best_of(&fvals);
        fvals[i] = objective.eval(point_to_indices(simplex[i], n), best);
    }

    for _ in 0..cfg.max_iters {
        sort_vertices(&mut simplex, &mut fvals);
        if simplex_diameter(&simplex) < cfg.tol {
            break;
        }
        let best = best_of(&fvals);

        // centroid of the two best vertices; reflect the worst through it
        let centroid =
            [0.5 * (simplex[0][0] + simplex[1][0]), 0.5 * (simplex[0][1] + simplex[1][1])];
        let xr = reflect(centroid, simplex[2], ALPHA);
        let fr = objective.eval(point_to_indices(xr, n), best);

        if fr < fvals[0] {
            // expansion
            let xe = extend(centroid, xr, GAMMA);
            let fe = objective.eval(point_to_indices(xe, n), best);
            if fe < fr {
                (simplex[2], fvals[2]) = (xe, fe);
            } else {
                (simplex[2], fvals[2]) = (xr, fr);
            }
        } else if fr < fvals[1] {
            // reflection
            (simplex[2], fvals[2]) = (xr, fr);
        } else if fr < fvals[2] {
            // outside contraction
            let xc = extend(centroid, xr, RHO);
            let fc = objective.eval(point_to_indices(xc, n), best);
            if fc <= fr {
                (simplex[2], fvals[2]) = (xc, fc);
            } else {
                shrink(&mut simplex, &mut fvals, &mut objective, n, best);
            }
        } else {
            // inside contraction
            let xc = extend(centroid, simplex[2], RHO);
            let fc = objective.eval(point_to_indices(xc, n), best);
            if fc < fvals[2] {
                (simplex[2], fvals[2]) = (xc, fc);
            } else {
                shrink(&mut simplex, &mut fvals, &mut objective, n, best);
            }
        }
    }

    let mut best_idx = 0;
    for i in 1..3 {
        if fvals[i] < fvals[best_idx] {
            best_idx = i;
        }
    }
    let (best_i1, best_i2) = point_to_indices(simplex[best_idx], n);

    // scan the index-space neighborhood of the converged vertex
    let (mut final_i1, mut final_i2) = (best_i1, best_i2);
    if cfg.final_radius != 0 {
        let radius = cfg.final_radius as isize;
        let mut best = objective.eval((best_i1, best_i2), fvals[best_idx]);
        for d1 in -radius..=radius {
            for d2 in -radius..=radius {
                let Some(n1) = best_i1.checked_add_signed(d1) else { continue };
                let Some(n2) = best_i2.checked_add_signed(d2) else { continue };
                if n1 >= n || n2 >= n || n2 < n1 {
                    continue;
                }
                let cost = objective.eval((n1, n2), best);
                if cost < best {
                    best = cost;
                    (final_i1, final_i2) = (n1, n2);
                }
            }
        }
    }

    if let Some(plots) = plots {
        let grid = objective
            .cache
            .iter()
            .map(|&cost| if cost == UNEVALUATED { 0 } else { cost })
            .collect();
        plots.push(Plot::sizes(format!("pivot objective, block size {n}"), n, n, grid));
    }

    (final_i1, final_i2)
}

// HELPERS
// --------------------------------------------------------------------------------------------

/// Maps a `(u, v)` point to the ordered fraction pair `(f1, f2)`.
fn uv_to_f(u: f32, v: f32) -> (f32, f32) {
    (u.max(0.0), (u + (1.0 - u) * v).min(1.0))
}

/// Maps a fraction to an order-statistic index by rounding.
fn f_to_index(f: f32, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let scaled = f * (n - 1) as f32;
    let idx = (scaled + 0.5).floor().max(0.0) as usize;
    idx.min(n - 1)
}

/// Maps a simplex point to a valid index pair with `i1 <= i2 < n`.
fn point_to_indices(point: [f32; 2], n: usize) -> (usize, usize) {
    let (f1, f2) = uv_to_f(point[0], point[1]);
    let i1 = f_to_index(f1, n);
    let i2 = f_to_index(f2, n).max(i1);
    (i1, i2)
}

/// Moves from `from` through `towards` by `coeff`, clamped to the unit square.
fn extend(from: [f32; 2], towards: [f32; 2], coeff: f32) -> [f32; 2] {
    [
        (from[0] + coeff * (towards[0] - from[0])).clamp(0.0, 1.0),
        (from[1] + coeff * (towards[1] - from[1])).clamp(0.0, 1.0),
    ]
}

/// Reflects `worst` through `centroid` by `coeff`, clamped to the unit square.
fn reflect(centroid: [f32; 2], worst: [f32; 2], coeff: f32) -> [f32; 2] {
    [
        (centroid[0] + coeff * (centroid[0] - worst[0])).clamp(0.0, 1.0),
        (centroid[1] + coeff * (centroid[1] - worst[1])).clamp(0.0, 1.0),
    ]
}

/// Sorts the vertices by objective value, best first.
fn sort_vertices(simplex: &mut [[f32; 2]; 3], fvals: &mut [usize; 3]) {
    for a in 0..2 {
        let mut min = a;
        for b in a + 1..3 {
            if fvals[b] < fvals[min] {
                min = b;
            }
        }
        if min != a {
            fvals.swap(a, min);
            simplex.swap(a, min);
        }
    }
}

/// Returns the L-infinity diameter of the simplex.
fn simplex_diameter(simplex: &[[f32; 2]; 3]) -> f32 {
    let mut max = 0.0f32;
    for i in 0..3 {
        for j in i + 1..3 {
            let d = (simplex[i][0] - simplex[j][0])
                .abs()
                .max((simplex[i][1] - simplex[j][1]).abs());
            max = max.max(d);
        }
    }
    max
}

/// Returns the smallest objective value seen so far.
fn best_of(fvals: &[usize; 3]) -> usize {
    *fvals.iter().min().expect("three vertices")
}

/// Contracts every vertex towards the best one and re-evaluates.
fn shrink(
    simplex: &mut [[f32; 2]; 3],
    fvals: &mut [usize; 3],
    objective: &mut Objective<'_>,
    n: usize,
    best: usize,
) {
    for i in 1..3 {
        simplex[i] = extend(simplex[0], simplex[i], SIGMA);
        fvals[i] = objective.eval(point_to_indices(simplex[i], n), best);
    }
}

// TESTS
// ================================================================================================
