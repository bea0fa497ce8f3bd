use alloc::vec::Vec;

use pretty_assertions::assert_eq;

use super::{Op, OperandMask, Operator};

#[test]
fn inverse_is_an_involution() {
    for op in Op::ALL {
        assert_eq!(op.inverse().inverse(), op, "{op}");
    }
}

#[test]
fn inverse_pairs() {
    assert_eq!(Op::Pa.inverse(), Op::Pb);
    assert_eq!(Op::Ra.inverse(), Op::Rra);
    assert_eq!(Op::Rb.inverse(), Op::Rrb);
    assert_eq!(Op::Rr.inverse(), Op::Rrr);
    // swaps and NOP are self-inverse
    for op in [Op::Sa, Op::Sb, Op::Ss, Op::Nop] {
        assert_eq!(op.inverse(), op, "{op}");
    }
}

#[test]
fn cost_is_zero_only_for_nop() {
    for op in Op::ALL {
        assert_eq!(op.cost(), if op == Op::Nop { 0 } else { 1 }, "{op}");
    }
}

#[test]
fn mask_and_operator_decomposition() {
    assert_eq!(Op::Ss.operator(), Operator::Swap);
    assert_eq!(Op::Ss.mask(), OperandMask { a: true, b: true });
    assert_eq!(Op::Pa.operator(), Operator::Push);
    assert_eq!(Op::Pa.mask(), OperandMask { a: true, b: false });
    assert_eq!(Op::Pb.mask(), OperandMask { a: false, b: true });
    assert_eq!(Op::Rra.operator(), Operator::RevRotate);
    assert_eq!(Op::Nop.operator(), Operator::Nop);
    assert_eq!(Op::Nop.mask(), OperandMask { a: false, b: false });

    // a push targets exactly one stack
    for op in Op::ALL {
        if op.operator() == Operator::Push {
            assert_ne!(op.mask().a, op.mask().b, "{op}");
        }
    }
}

#[test]
fn inverse_preserves_mask() {
    for op in Op::ALL {
        if op.operator() != Operator::Push {
            assert_eq!(op.inverse().mask(), op.mask(), "{op}");
        }
    }
}

#[test]
fn display_names() {
    let names: Vec<&str> = Op::ALL.iter().map(|op| op.name()).collect();
    assert_eq!(
        names,
        ["NOP", "SA", "SB", "SS", "PA", "PB", "RA", "RB", "RR", "RRA", "RRB", "RRR"]
    );
    assert_eq!(format!("{}", Op::Rra), "RRA");
}
