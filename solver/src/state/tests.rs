use pretty_assertions::assert_eq;
use proptest::prelude::*;
use push_meta_core::{InputError, Op};
use rstest::rstest;

use super::State;

// CONSTRUCTION
// ================================================================================================

#[test]
fn new_places_values_on_a() {
    let state = State::new(&[3, 1, 2]).unwrap();
    assert_eq!(state.stack_a().as_slice(), &[3, 1, 2]);
    assert!(state.stack_b().is_empty());
    assert_eq!(state.op_count(), 0);
    assert!(state.is_recording());
    assert_eq!(state.history().len(), 1);
    assert_eq!(state.history()[0].op(), Op::Nop);
    assert_eq!(state.history()[0].stack_a(), &[3, 1, 2]);
    assert!(state.history()[0].stack_b().is_empty());
}

#[test]
fn new_rejects_empty_input() {
    assert_eq!(State::new(&[]), Err(InputError::Empty));
}

#[test]
fn new_rejects_duplicates() {
    assert_eq!(State::new(&[1, 2, 2]), Err(InputError::DuplicateValue(2)));
    assert_eq!(State::new(&[-4, 7, -4, 1]), Err(InputError::DuplicateValue(-4)));
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.stack_a.as_slice() == other.stack_a.as_slice()
            && self.stack_b.as_slice() == other.stack_b.as_slice()
    }
}

// OP SEMANTICS
// ================================================================================================

#[rstest]
#[case::sa(Op::Sa, &[1, 2, 3], &[4, 5], &[2, 1, 3], &[4, 5])]
#[case::sb(Op::Sb, &[1, 2, 3], &[4, 5], &[1, 2, 3], &[5, 4])]
#[case::ss(Op::Ss, &[1, 2, 3], &[4, 5], &[2, 1, 3], &[5, 4])]
#[case::pa(Op::Pa, &[1, 2, 3], &[4, 5], &[4, 1, 2, 3], &[5])]
#[case::pb(Op::Pb, &[1, 2, 3], &[4, 5], &[2, 3], &[1, 4, 5])]
#[case::ra(Op::Ra, &[1, 2, 3], &[4, 5], &[2, 3, 1], &[4, 5])]
#[case::rb(Op::Rb, &[1, 2, 3], &[4, 5], &[1, 2, 3], &[5, 4])]
#[case::rr(Op::Rr, &[1, 2, 3], &[4, 5], &[2, 3, 1], &[5, 4])]
#[case::rra(Op::Rra, &[1, 2, 3], &[4, 5], &[3, 1, 2], &[4, 5])]
#[case::rrb(Op::Rrb, &[1, 2, 3], &[4, 5], &[1, 2, 3], &[5, 4])]
#[case::rrr(Op::Rrr, &[1, 2, 3], &[4, 5], &[3, 1, 2], &[5, 4])]
#[case::nop(Op::Nop, &[1, 2, 3], &[4, 5], &[1, 2, 3], &[4, 5])]
fn op_semantics(
    #[case] op: Op,
    #[case] a: &[i32],
    #[case] b: &[i32],
    #[case] expect_a: &[i32],
    #[case] expect_b: &[i32],
) {
    let mut state = State::with_stacks(a, b);
    state.apply(op);
    assert_eq!(state.stack_a().as_slice(), expect_a);
    assert_eq!(state.stack_b().as_slice(), expect_b);
    assert_eq!(state.op_count(), op.cost());
}

#[test]
fn recording_appends_a_save_per_op() {
    let mut state = State::new(&[2, 1, 3]).unwrap();
    state.apply(Op::Sa);
    state.apply(Op::Pb);
    assert_eq!(state.history().len(), 3);
    assert_eq!(state.history()[1].op(), Op::Sa);
    assert_eq!(state.history()[1].stack_a(), &[1, 2, 3]);
    assert_eq!(state.history()[2].op(), Op::Pb);
    assert_eq!(state.history()[2].stack_a(), &[2, 3]);
    assert_eq!(state.history()[2].stack_b(), &[1]);
    assert_eq!(state.op_count(), 2);

    // the last save always mirrors the live configuration
    let last = state.history().last().unwrap();
    assert_eq!(last.stack_a(), state.stack_a().as_slice());
    assert_eq!(last.stack_b(), state.stack_b().as_slice());
}

#[test]
#[should_panic(expected = "stack is empty")]
fn push_from_empty_stack_panics() {
    let mut state = State::new(&[1, 2]).unwrap();
    state.apply(Op::Pa);
}

// BIFURCATION
// ================================================================================================

#[test]
fn bifurcated_state_does_not_record() {
    let mut origin = State::new(&[2, 1]).unwrap();
    origin.apply(Op::Sa);

    let mut probe = origin.bifurcate(0);
    assert!(!probe.is_recording());
    assert_eq!(probe.stack_a().as_slice(), &[2, 1]);
    assert_eq!(probe.op_count(), 0);

    probe.apply(Op::Sa);
    assert_eq!(probe.stack_a().as_slice(), &[1, 2]);
    assert_eq!(probe.history().len(), 1);
    assert_eq!(probe.op_count(), 1);

    // the origin is untouched
    assert_eq!(origin.history().len(), 2);
    assert_eq!(origin.stack_a().as_slice(), &[1, 2]);
}

#[test]
fn bifurcate_copies_the_history_prefix() {
    let mut origin = State::new(&[3, 1, 2]).unwrap();
    for op in [Op::Pb, Op::Sa, Op::Pa] {
        origin.apply(op);
    }
    let probe = origin.bifurcate(2);
    assert_eq!(probe.history().len(), 3);
    assert_eq!(probe.stack_a().as_slice(), origin.history()[2].stack_a());
    assert_eq!(probe.stack_b().as_slice(), origin.history()[2].stack_b());
}

#[test]
fn bifurcate_then_replay_reaches_any_later_save() {
    let mut origin = State::new(&[5, 3, 1, 4, 2]).unwrap();
    for op in [Op::Pb, Op::Pb, Op::Sa, Op::Ra, Op::Pa, Op::Pa, Op::Sa] {
        origin.apply(op);
    }
    let last = origin.history().len() - 1;
    for k in 0..last {
        for m in k..=last {
            let mut replayed = origin.bifurcate(k);
            for save in &origin.history()[k + 1..=m] {
                replayed.apply(save.op());
            }
            assert_eq!(replayed, origin.bifurcate(m), "k={k} m={m}");
        }
    }
}

#[test]
#[should_panic(expected = "bifurcation index out of bounds")]
fn bifurcate_past_history_panics() {
    let origin = State::new(&[1, 2]).unwrap();
    origin.bifurcate(1);
}

#[test]
fn fork_copies_stacks_without_history() {
    let mut origin = State::new(&[3, 1, 2]).unwrap();
    origin.apply(Op::Pb);
    let fork = origin.fork();
    assert!(!fork.is_recording());
    assert!(fork.history().is_empty());
    assert_eq!(fork.stack_a().as_slice(), origin.stack_a().as_slice());
    assert_eq!(fork.stack_b().as_slice(), origin.stack_b().as_slice());
    assert_eq!(fork.op_count(), origin.op_count());
}

// UNDO
// ================================================================================================

#[rstest]
fn apply_then_undo_restores_the_state(
    #[values(
        Op::Nop,
        Op::Sa,
        Op::Sb,
        Op::Ss,
        Op::Pa,
        Op::Pb,
        Op::Ra,
        Op::Rb,
        Op::Rr,
        Op::Rra,
        Op::Rrb,
        Op::Rrr
    )]
    op: Op,
) {
    let origin = State::with_stacks(&[2, 1, 4], &[3, 5]);
    let mut probe = origin.bifurcate(0);
    probe.apply(op);
    probe.undo(op);
    assert_eq!(probe.stack_a().as_slice(), &[2, 1, 4]);
    assert_eq!(probe.stack_b().as_slice(), &[3, 5]);
    assert_eq!(probe.op_count(), 0);
}

#[test]
#[should_panic(expected = "undo requires a bifurcated state")]
fn undo_on_recording_state_panics() {
    let mut state = State::new(&[2, 1]).unwrap();
    state.apply(Op::Sa);
    state.undo(Op::Sa);
}

proptest! {
    // applying a random legal sequence and undoing it in reverse is the identity
    #[test]
    fn undo_reverses_arbitrary_sequences(choices in proptest::collection::vec(0usize..11, 1..60)) {
        let origin = State::with_stacks(&[4, 1, 6, 3], &[2, 5]);
        let mut probe = origin.bifurcate(0);

        let mut applied = Vec::new();
        for choice in choices {
            let op = Op::ALL[1 + choice % 11];
            let legal = match op {
                Op::Sa => probe.stack_a().len() >= 2,
                Op::Sb => probe.stack_b().len() >= 2,
                Op::Ss => probe.stack_a().len() >= 2 && probe.stack_b().len() >= 2,
                Op::Pa => !probe.stack_b().is_empty(),
                Op::Pb => !probe.stack_a().is_empty(),
                Op::Ra | Op::Rra => !probe.stack_a().is_empty(),
                Op::Rb | Op::Rrb => !probe.stack_b().is_empty(),
                Op::Rr | Op::Rrr => {
                    !probe.stack_a().is_empty() && !probe.stack_b().is_empty()
                },
                Op::Nop => true,
            };
            if legal {
                probe.apply(op);
                applied.push(op);
            }
        }
        for op in applied.iter().rev() {
            probe.undo(*op);
        }
        prop_assert_eq!(probe.stack_a().as_slice(), &[4, 1, 6, 3]);
        prop_assert_eq!(probe.stack_b().as_slice(), &[2, 5]);
        prop_assert_eq!(probe.op_count(), 0);
    }
}
