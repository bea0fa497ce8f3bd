//! Closed-form op sequences for single moves and small sorts.

use push_meta_core::Op::{self, Pa, Pb, Ra, Rb, Rra, Rrb, Sa, Sb};

use super::Location::{self, ABot, ATop, BBot, BTop};

/// The fixed 0–3 op sequence transferring one element between two locations.
pub(super) const fn move_ops(from: Location, to: Location) -> &'static [Op] {
    match (from, to) {
        (ATop, ATop) => &[],
        (ATop, ABot) => &[Ra],
        (ATop, BTop) => &[Pb],
        (ATop, BBot) => &[Pb, Rb],

        (ABot, ATop) => &[Rra],
        (ABot, ABot) => &[],
        (ABot, BTop) => &[Rra, Pb],
        (ABot, BBot) => &[Rra, Pb, Rb],

        (BTop, ATop) => &[Pa],
        (BTop, ABot) => &[Pa, Ra],
        (BTop, BTop) => &[],
        (BTop, BBot) => &[Rb],

        (BBot, ATop) => &[Rrb, Pa],
        (BBot, ABot) => &[Rrb, Pa, Ra],
        (BBot, BTop) => &[Rrb],
        (BBot, BBot) => &[],
    }
}

/// The rank of a three-element block: the index of its permutation pattern, 0 for descending
/// `u > v > w` through 5 for ascending `u < v < w`, where `u`, `v`, `w` are positions 0, 1, 2.
pub(super) const fn rank3(u: i32, v: i32, w: i32) -> usize {
    if u > v && v > w {
        0
    } else if u > w && w > v {
        1
    } else if v > u && u > w {
        2
    } else if v > w && w > u {
        3
    } else if w > u && u > v {
        4
    } else {
        5
    }
}

/// Sequences moving a two-element block to the top of A in order. Rank 0 means the block is
/// already ascending, rank 1 descending.
pub(super) const fn sort2_ops(dest: Location, rank: usize) -> &'static [Op] {
    match (dest, rank) {
        (ATop, 0) => &[],
        (ATop, _) => &[Sa],

        (ABot, 0) => &[Rra, Rra, Sa],
        (ABot, _) => &[Rra, Rra],

        (BTop, 0) => &[Pa, Pa, Sa],
        (BTop, _) => &[Pa, Pa],

        (BBot, 0) => &[Rrb, Rrb, Pa, Pa],
        (BBot, _) => &[Rrb, Rrb, Pa, Pa, Sa],
    }
}

/// Sequences moving a three-element block of the given [rank3] to the top of A in order.
///
/// The `A_TOP` rows rotate stack A and are only valid when the block spans it; `sort_3`
/// reroutes non-spanning blocks through B before consulting this table.
pub(super) const fn sort3_ops(dest: Location, rank: usize) -> &'static [Op] {
    match (dest, rank) {
        (ATop, 0) => &[Sa, Rra],
        (ATop, 1) => &[Ra],
        (ATop, 2) => &[Rra],
        (ATop, 3) => &[Sa, Ra],
        (ATop, 4) => &[Sa],
        (ATop, _) => &[],

        (ABot, 0) => &[Rra, Rra, Rra],
        (ABot, 1) => &[Rra, Rra, Rra, Sa],
        (ABot, 2) => &[Rra, Rra, Sa, Rra],
        (ABot, 3) => &[Rra, Rra, Sa, Rra, Sa],
        (ABot, 4) => &[Rra, Rra, Pb, Rra, Sa, Pa],
        (ABot, _) => &[Rra, Pb, Rra, Rra, Sa, Pa],

        (BTop, 0) => &[Pa, Pa, Pa],
        (BTop, 1) => &[Pa, Sb, Pa, Pa],
        (BTop, 2) => &[Sb, Pa, Pa, Pa],
        (BTop, 3) => &[Sb, Pa, Sb, Pa, Pa],
        (BTop, 4) => &[Pa, Sb, Pa, Sa, Pa],
        (BTop, _) => &[Sb, Pa, Sb, Pa, Sa, Pa],

        (BBot, 0) => &[Rrb, Pa, Rrb, Pa, Rrb, Pa],
        (BBot, 1) => &[Rrb, Pa, Rrb, Rrb, Pa, Pa],
        (BBot, 2) => &[Rrb, Rrb, Pa, Pa, Rrb, Pa],
        (BBot, 3) => &[Rrb, Rrb, Pa, Rrb, Pa, Pa],
        (BBot, 4) => &[Rrb, Rrb, Sb, Rrb, Pa, Pa, Pa],
        (BBot, _) => &[Rrb, Rrb, Rrb, Pa, Pa, Pa],
    }
}
