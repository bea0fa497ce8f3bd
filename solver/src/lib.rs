//! Structure-aware push-swap solver.
//!
//! The solver takes a permutation of distinct integers on stack A and produces a short
//! instruction sequence that sorts it, in two phases:
//!
//! 1. a dual-pivot quicksort over logical blocks of the two stacks, with the pivot pair of
//!    each recursion tuned by a bounded Nelder–Mead search that scores candidates by actually
//!    executing the nested sort on a cloned machine ([quicksort]);
//! 2. a peephole pass that replays the recorded history, searches short op sequences which
//!    skip ahead to a later configuration of the original trace, and stitches the best skips
//!    together with a backwards dynamic program ([optimizer]).

pub mod block;
pub mod optimizer;
pub mod plot;
pub mod quicksort;

mod state;

// RE-EXPORTS
// ================================================================================================

pub use push_meta_core::{InputError, Op, OperandMask, Operator, Stack};

pub use crate::{
    optimizer::{Optimized, OptimizerConfig, optimize},
    plot::{Plot, PlotSet, PlotValues},
    quicksort::{PivotConfig, sort_quicksort, sort_quicksort_with_plots},
    state::{Save, State},
};
