use push_meta_core::Op;

use crate::state::State;

mod tables;
use tables::{move_ops, rank3, sort2_ops, sort3_ops};


// LOCATION
// ================================================================================================

/// One of the four (stack, end) addresses a block can live at.
///
/// ```text
///    A           B
/// +-----+     +-----+
/// | TOP |     | TOP |
/// | ... |     | ... |
/// | BOT |     | BOT |
/// +-----+     +-----+
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Location {
    ATop,
    ABot,
    BTop,
    BBot,
}

impl Location {
    /// Returns true if this location addresses stack B.
    pub const fn is_on_b(self) -> bool {
        matches!(self, Location::BTop | Location::BBot)
    }
}

// BLOCK
// ================================================================================================

/// A logical reference to the `size` elements nearest to a (stack, end) address.
///
/// Blocks carry no storage; they are traversal policies over a [State]. Position 0 is the
/// element nearest the addressed end.
#[derive(Clone, Copy, Debug)]
pub struct Block {
    pub dest: Location,
    pub size: usize,
}

/// The three sub-blocks produced by a two-pivot [split]: `top` holds the values below the
/// lower pivot, `mid` the values between the pivots, `bot` the values at or above the upper
/// pivot.
#[derive(Clone, Copy, Debug)]
pub struct Split {
    pub top: Block,
    pub mid: Block,
    pub bot: Block,
}

// BLOCK PRIMITIVES
// ================================================================================================

/// Reads the element at position `pos` of the given location.
pub fn value(state: &State, loc: Location, pos: usize) -> i32 {
    match loc {
        Location::ATop => state.stack_a().get(pos),
        Location::ABot => state.stack_a().get_back(pos),
        Location::BTop => state.stack_b().get(pos),
        Location::BBot => state.stack_b().get_back(pos),
    }
}

/// Moves the single element nearest `from` to the corresponding end of `to`, emitting the
/// closed-form 0–3 op sequence for the pair.
pub fn move_top(state: &mut State, from: Location, to: Location) {
    let source = if from.is_on_b() { state.stack_b() } else { state.stack_a() };
    assert!(!source.is_empty(), "move from an empty stack");
    for &op in move_ops(from, to) {
        state.apply(op);
    }
}

/// Sorts a block of two elements onto the top of A.
pub fn sort_2(state: &mut State, blk: Block) {
    assert_eq!(blk.size, 2, "sort_2 takes a block of two");
    let rank = usize::from(value(state, blk.dest, 0) > value(state, blk.dest, 1));
    for &op in sort2_ops(blk.dest, rank) {
        state.apply(op);
    }
}

/// Sorts a block of three elements onto the top of A.
pub fn sort_3(state: &mut State, blk: Block) {
    assert_eq!(blk.size, 3, "sort_3 takes a block of three");

    // The A_TOP sequences rotate stack A, which is only safe when the block spans the whole
    // stack. Otherwise park the block on B and sort it from there; the B_TOP sequences touch
    // nothing but the block itself.
    if blk.dest == Location::ATop && state.stack_a().len() > 3 {
        for _ in 0..3 {
            state.apply(Op::Pb);
        }
        return sort_3(state, Block { dest: Location::BTop, size: 3 });
    }

    let rank = rank3(
        value(state, blk.dest, 0),
        value(state, blk.dest, 1),
        value(state, blk.dest, 2),
    );
    for &op in sort3_ops(blk.dest, rank) {
        state.apply(op);
    }
}

/// Splits a block three ways around the pivots `p1 <= p2`.
///
/// The block is consumed top-down; each element is routed by value: `v >= p2` to `bot`,
/// `p1 <= v < p2` to `mid`, `v < p1` to `top`. Destinations follow the canonical mapping: mid
/// goes to the opposite stack at the near end, bot stays on the same stack at the far end,
/// top goes to the opposite stack at the far end. The returned sizes sum to `blk.size`.
pub fn split(state: &mut State, blk: Block, p1: i32, p2: i32) -> Split {
    assert!(p1 <= p2, "pivots must be ordered");

    let mut split = Split {
        top: Block {
            dest: if blk.dest == Location::BBot { Location::BTop } else { Location::BBot },
            size: 0,
        },
        mid: Block {
            dest: if blk.dest.is_on_b() { Location::ABot } else { Location::BTop },
            size: 0,
        },
        bot: Block {
            dest: if blk.dest == Location::ATop { Location::ABot } else { Location::ATop },
            size: 0,
        },
    };

    for _ in 0..blk.size {
        let val = value(state, blk.dest, 0);
        if val >= p2 {
            move_top(state, blk.dest, split.bot.dest);
            split.bot.size += 1;
        } else if val >= p1 {
            move_top(state, blk.dest, split.mid.dest);
            split.mid.size += 1;
        } else {
            move_top(state, blk.dest, split.top.dest);
            split.top.size += 1;
        }
    }
    split
}
