//! Peephole optimization of a recorded op trace.
//!
//! For every index `i` of the history, a bounded backtracking search looks for a short op
//! sequence that transforms configuration `i` directly into some later configuration `j` of
//! the same trace: a *skip* worth `(j - i) - cost` ops. A backwards dynamic program then
//! stitches the most valuable non-overlapping skips into a shorter equivalent sequence.
//!
//! Skip searches at different indices are independent; with the `concurrent` feature they
//! fan out over a thread pool, each worker writing only its own slot of the result vector,
//! so the outcome is identical to the serial pass.

use push_meta_core::Op;
#[cfg(feature = "concurrent")]
use rayon::prelude::*;
use tracing::debug;

use crate::state::State;


// OPTIMIZER CONFIG
// ================================================================================================

/// Bounds for the per-index skip search.
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    /// How far ahead of each index the history is scanned for matching configurations.
    pub search_width: usize,
    /// Maximum candidate sequence length.
    pub search_depth: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self { search_width: 1000, search_depth: 4 }
    }
}

// OPTIMIZED RESULT
// ================================================================================================

/// The outcome of a peephole pass: the reconstructed op sequence and the state produced by
/// replaying it from the initial configuration.
#[derive(Clone, Debug)]
pub struct Optimized {
    pub ops: Vec<Op>,
    pub state: State,
}

impl Optimized {
    /// Returns the length of the optimized sequence.
    pub fn op_count(&self) -> usize {
        self.state.op_count()
    }
}

// SKIP
// ================================================================================================

/// The best shortcut found at one history index: `ops` reach configuration `j` and save
/// `value` ops over the original segment.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Skip {
    j: usize,
    value: usize,
    ops: Vec<Op>,
}

/// Mutable context of one index's backtracking search.
struct SkipSearch {
    best: Option<Skip>,
    candidate: Vec<Op>,
    cost: usize,
}

// PEEPHOLE OPTIMIZER
// ================================================================================================

/// Rewrites the state's recorded trace into a shorter equivalent op sequence.
///
/// # Panics
/// Panics if `origin` is not a recording state, or if its trace does not end in a sorted
/// configuration.
#[tracing::instrument("peephole_optimize", skip_all)]
pub fn optimize(origin: &State, cfg: &OptimizerConfig) -> Optimized {
    assert!(origin.is_recording(), "peephole optimization reads a recorded history");
    let n = origin.history().len() - 1;

    let skips = collect_skips(origin, cfg, n);

    // dp[i] holds the maximum savings achievable from history index i onward
    let mut dp = vec![0usize; n + 1];
    let mut take = vec![false; n];
    for i in (0..n).rev() {
        dp[i] = dp[i + 1];
        if let Some(skip) = &skips[i] {
            if skip.j > i && skip.value + dp[skip.j] > dp[i] {
                dp[i] = skip.value + dp[skip.j];
                take[i] = true;
            }
        }
    }

    // walk forward, emitting skips where the dp chose them and original ops elsewhere
    let mut ops = Vec::with_capacity(n);
    let mut i = 0;
    while i < n {
        if take[i] {
            let skip = skips[i].as_ref().expect("skip chosen by the dp");
            ops.extend(skip.ops.iter().copied().filter(|&op| op != Op::Nop));
            i = skip.j;
        } else {
            ops.push(origin.history()[i + 1].op());
            i += 1;
        }
    }

    let mut state = origin.bifurcate(0);
    for &op in &ops {
        state.apply(op);
    }
    assert!(state.is_sorted(), "optimized sequence must still sort");
    debug!(base = n, optimized = state.op_count(), saved = dp[0], "optimization complete");

    Optimized { ops, state }
}

/// Runs the per-index skip searches, concurrently when the `concurrent` feature is enabled.
fn collect_skips(origin: &State, cfg: &OptimizerConfig, n: usize) -> Vec<Option<Skip>> {
    #[cfg(feature = "concurrent")]
    {
        (0..n).into_par_iter().map(|i| search_skip(origin, i, cfg)).collect()
    }
    #[cfg(not(feature = "concurrent"))]
    {
        collect_skips_serial(origin, cfg, n)
    }
}

/// Serial reference implementation of [collect_skips].
#[cfg_attr(all(feature = "concurrent", not(test)), allow(dead_code))]
fn collect_skips_serial(origin: &State, cfg: &OptimizerConfig, n: usize) -> Vec<Option<Skip>> {
    (0..n).map(|i| search_skip(origin, i, cfg)).collect()
}

// SKIP SEARCH
// ================================================================================================

/// Finds the most valuable skip starting at history index `start`.
fn search_skip(origin: &State, start: usize, cfg: &OptimizerConfig) -> Option<Skip> {
    let mut probe = origin.bifurcate(start);
    let mut search = SkipSearch {
        best: None,
        candidate: Vec::with_capacity(cfg.search_depth),
        cost: 0,
    };
    backtrack(origin, &mut probe, start, cfg, 1, &mut search);
    search.best
}

/// Depth-first enumeration of candidate op sequences of length up to `cfg.search_depth`.
///
/// `NOP` participates at zero cost but never extends the recursion. Candidates that undo
/// their own previous op, or repeat one of the involutions `SA`/`SB`/`SS`/`RR`, are pruned.
fn backtrack(
    origin: &State,
    probe: &mut State,
    start: usize,
    cfg: &OptimizerConfig,
    depth: usize,
    search: &mut SkipSearch,
) {
    for op in Op::ALL {
        if !preconditions_hold(probe, op) {
            continue;
        }
        if let Some(&prev) = search.candidate.last() {
            if op.inverse() == prev {
                continue;
            }
            if op == prev && matches!(op, Op::Sa | Op::Sb | Op::Ss | Op::Rr) {
                continue;
            }
        }

        search.cost += op.cost();
        search.candidate.push(op);
        probe.apply(op);

        let from = start + depth;
        if let Some(j) = find_future(origin, probe, start, from, cfg) {
            if j > from && j - start > search.cost {
                let value = (j - start) - search.cost;
                if search.best.as_ref().is_none_or(|best| value > best.value) {
                    search.best = Some(Skip { j, value, ops: search.candidate.clone() });
                }
            }
        }

        if depth < cfg.search_depth && op != Op::Nop {
            backtrack(origin, probe, start, cfg, depth + 1, search);
        }

        probe.undo(op);
        search.candidate.pop();
        search.cost -= op.cost();
    }
}

/// Returns whether `op` may be applied to the probe during the search.
///
/// Stricter than the machine's own preconditions: rotating a singleton stack is a legal but
/// useless identity, so the search refuses it.
fn preconditions_hold(state: &State, op: Op) -> bool {
    let (a, b) = (state.stack_a().len(), state.stack_b().len());
    match op {
        Op::Nop => true,
        Op::Sa => a >= 2,
        Op::Sb => b >= 2,
        Op::Ss => a >= 2 && b >= 2,
        Op::Pa => b > 0,
        Op::Pb => a > 0,
        Op::Ra | Op::Rra => a >= 2,
        Op::Rb | Op::Rrb => b >= 2,
        Op::Rr | Op::Rrr => a >= 2 && b >= 2,
    }
}

/// Returns the last history index within the search window whose configuration equals the
/// probe's, scanning `[from, min(n, start + width))`.
fn find_future(
    origin: &State,
    probe: &State,
    start: usize,
    from: usize,
    cfg: &OptimizerConfig,
) -> Option<usize> {
    let n = origin.history().len() - 1;
    let end = n.min(start + cfg.search_width);
    let mut found = None;
    for j in from..end {
        if origin.history()[j].matches(probe.stack_a(), probe.stack_b()) {
            found = Some(j);
        }
    }
    found
}
