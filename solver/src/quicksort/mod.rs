use tracing::debug;

use crate::{
    block::{Block, Location, move_top, sort_2, sort_3, split},
    plot::PlotSet,
    state::State,
};

mod pivots;
pub use pivots::PivotConfig;
use pivots::pick_pivots;


// QUICKSORT DRIVER
// ================================================================================================

/// Sorts the state with the dual-pivot block quicksort, recording every op in the history.
///
/// Already-sorted inputs emit zero ops.
///
/// # Panics
/// Panics if stack B is not empty or stack A is not full.
#[tracing::instrument("sort_quicksort", skip_all)]
pub fn sort_quicksort(state: &mut State, cfg: &PivotConfig) {
    sort_inner(state, cfg, None);
}

/// Like [sort_quicksort], but records the pivot tuner's objective grids into `plots`.
#[tracing::instrument("sort_quicksort", skip_all)]
pub fn sort_quicksort_with_plots(state: &mut State, cfg: &PivotConfig, plots: &mut PlotSet) {
    sort_inner(state, cfg, Some(plots));
}

fn sort_inner(state: &mut State, cfg: &PivotConfig, plots: Option<&mut PlotSet>) {
    assert!(state.stack_b().is_empty(), "sort starts with an empty stack B");
    assert_eq!(
        state.stack_a().len(),
        state.stack_a().capacity(),
        "sort starts with all values on stack A"
    );
    if state.stack_a().is_sorted() {
        return;
    }

    let blk = Block { dest: Location::ATop, size: state.stack_a().len() };
    quicksort_blk(state, blk, cfg, plots);
    debug!(op_count = state.op_count(), "sort complete");
}

/// Recursively sorts one block onto the top of A.
///
/// Small blocks go through the closed-form sorts; larger ones are split around a tuned pivot
/// pair and the pieces recursed bottom-first, so that the live op-count seen by later pivot
/// evaluations reflects all work already done.
pub(crate) fn quicksort_blk(
    state: &mut State,
    blk: Block,
    cfg: &PivotConfig,
    mut plots: Option<&mut PlotSet>,
) {
    if blk.size == 0 {
        return;
    }
    let blk = normalize(state, blk);
    match blk.size {
        1 => return move_top(state, blk.dest, Location::ATop),
        2 => return sort_2(state, blk),
        3 => return sort_3(state, blk),
        _ => {},
    }

    let (p1, p2) = pick_pivots(state, blk, cfg, plots.as_deref_mut());
    let pieces = split(state, blk, p1, p2);
    quicksort_blk(state, pieces.bot, cfg, plots.as_deref_mut());
    quicksort_blk(state, pieces.mid, cfg, plots.as_deref_mut());
    quicksort_blk(state, pieces.top, cfg, plots);
}

/// A block addressed from the bottom of a stack it entirely fills is the same block addressed
/// from the top.
fn normalize(state: &State, blk: Block) -> Block {
    match blk.dest {
        Location::ABot if state.stack_a().len() == blk.size => {
            Block { dest: Location::ATop, ..blk }
        },
        Location::BBot if state.stack_b().len() == blk.size => {
            Block { dest: Location::BTop, ..blk }
        },
        _ => blk,
    }
}
