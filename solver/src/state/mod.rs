use push_meta_core::{InputError, Op, Operator, Stack};

#[cfg(test)]
mod tests;

// SAVE
// ================================================================================================

/// A snapshot of both stacks together with the op that produced it.
///
/// The stack contents are stored as one contiguous buffer, A then B, both top-first. Saves are
/// immutable once appended to a history.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Save {
    values: Vec<i32>,
    len_a: usize,
    op: Op,
}

impl Save {
    /// Captures the current configuration of the two stacks.
    fn capture(stack_a: &Stack, stack_b: &Stack, op: Op) -> Self {
        let mut values = Vec::with_capacity(stack_a.len() + stack_b.len());
        values.extend_from_slice(stack_a.as_slice());
        values.extend_from_slice(stack_b.as_slice());
        Self { values, len_a: stack_a.len(), op }
    }

    /// Returns the op that produced this snapshot.
    pub fn op(&self) -> Op {
        self.op
    }

    /// Returns the contents of stack A, top first.
    pub fn stack_a(&self) -> &[i32] {
        &self.values[..self.len_a]
    }

    /// Returns the contents of stack B, top first.
    pub fn stack_b(&self) -> &[i32] {
        &self.values[self.len_a..]
    }

    /// Returns true if the snapshot equals the given stack configuration exactly.
    pub(crate) fn matches(&self, stack_a: &Stack, stack_b: &Stack) -> bool {
        self.len_a == stack_a.len()
            && self.stack_a() == stack_a.as_slice()
            && self.stack_b() == stack_b.as_slice()
    }
}

// STATE
// ================================================================================================

/// The push-swap machine: two stacks, an append-only history of saves, and an op counter.
///
/// A state is in one of two modes:
/// - **recording** (`bifurcate_point == 0`): every applied op appends a [Save] to the history,
///   so `history[k]` always captures the configuration after the first `k` ops, with
///   `history[0]` the initial configuration (op `NOP`);
/// - **bifurcated** (`bifurcate_point > 0`): ops mutate the stacks and the counter but leave
///   the history untouched. Only bifurcated states may [undo](Self::undo).
///
/// Bifurcated states own a value-copied prefix of the origin's history, never aliased
/// pointers, so any number of them can run concurrently against one origin.
#[derive(Clone, Debug)]
pub struct State {
    stack_a: Stack,
    stack_b: Stack,
    history: Vec<Save>,
    bifurcate_point: usize,
    op_count: usize,
    search_depth: usize,
}

impl State {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns a recording state with `values` on stack A (first value on top) and an empty
    /// stack B.
    ///
    /// # Errors
    /// Returns an error if `values` is empty or contains a duplicate.
    pub fn new(values: &[i32]) -> Result<Self, InputError> {
        if values.is_empty() {
            return Err(InputError::Empty);
        }
        let mut seen = values.to_vec();
        seen.sort_unstable();
        if let Some(pair) = seen.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(InputError::DuplicateValue(pair[0]));
        }

        let stack_a = Stack::with_values(values.len(), values);
        let stack_b = Stack::new(values.len());
        let history = vec![Save::capture(&stack_a, &stack_b, Op::Nop)];
        Ok(Self {
            stack_a,
            stack_b,
            history,
            bifurcate_point: 0,
            op_count: 0,
            search_depth: 0,
        })
    }

    /// Returns a bifurcated state seeded from `history[k]`.
    ///
    /// The new state's history is a fresh copy of saves `0..=k`, its op counter is reset, and
    /// it does not record. Replaying `history[k + 1..=m]` ops on it reproduces the
    /// configuration of `history[m]`.
    ///
    /// # Panics
    /// Panics if `k` is not a valid history index.
    pub fn bifurcate(&self, k: usize) -> Self {
        assert!(k < self.history.len(), "bifurcation index out of bounds");
        let save = &self.history[k];
        let capacity = save.values.len();
        Self {
            stack_a: Stack::with_values(capacity, save.stack_a()),
            stack_b: Stack::with_values(capacity, save.stack_b()),
            history: self.history[..=k].to_vec(),
            bifurcate_point: k + 1,
            op_count: 0,
            search_depth: 0,
        }
    }

    /// Returns a non-recording copy of the current stacks without any history.
    ///
    /// The op counter and the search depth carry over; the pivot tuner relies on both.
    pub(crate) fn fork(&self) -> Self {
        Self {
            stack_a: self.stack_a.clone(),
            stack_b: self.stack_b.clone(),
            history: Vec::new(),
            bifurcate_point: self.history.len().max(1),
            op_count: self.op_count,
            search_depth: self.search_depth,
        }
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns stack A.
    pub fn stack_a(&self) -> &Stack {
        &self.stack_a
    }

    /// Returns stack B.
    pub fn stack_b(&self) -> &Stack {
        &self.stack_b
    }

    /// Returns the number of non-`NOP` ops applied to this state.
    pub fn op_count(&self) -> usize {
        self.op_count
    }

    /// Returns the recorded history, oldest save first.
    pub fn history(&self) -> &[Save] {
        &self.history
    }

    /// Returns true if applied ops append to the history.
    pub fn is_recording(&self) -> bool {
        self.bifurcate_point == 0
    }

    /// Returns the pivot-tuner recursion depth of this state.
    pub fn search_depth(&self) -> usize {
        self.search_depth
    }

    /// Returns true if all values sit on stack A in strictly ascending order.
    pub fn is_sorted(&self) -> bool {
        self.stack_b.is_empty() && self.stack_a.is_sorted()
    }

    // STATE MUTATORS
    // --------------------------------------------------------------------------------------------

    /// Executes `op` and, on a recording state, appends the resulting configuration to the
    /// history.
    ///
    /// # Panics
    /// Panics if the op's preconditions do not hold: swaps need two elements on every targeted
    /// stack, pushes a non-empty source stack, rotations a non-empty targeted stack.
    pub fn apply(&mut self, op: Op) {
        self.execute(op);
        self.op_count += op.cost();
        if self.is_recording() {
            self.history.push(Save::capture(&self.stack_a, &self.stack_b, op));
        }
        debug_assert_eq!(
            self.stack_a.len() + self.stack_b.len(),
            self.stack_a.capacity(),
            "every value lives on exactly one stack"
        );
    }

    /// Reverts `op` by executing its inverse and decrementing the op counter.
    ///
    /// # Panics
    /// Panics on a recording state: histories are append-only, so only bifurcated states can
    /// walk backwards.
    pub fn undo(&mut self, op: Op) {
        assert!(!self.is_recording(), "undo requires a bifurcated state");
        self.execute(op.inverse());
        self.op_count -= op.cost();
    }

    /// Records one more level of nested pivot evaluation.
    pub(crate) fn increment_search_depth(&mut self) {
        self.search_depth += 1;
    }

    // HELPERS
    // --------------------------------------------------------------------------------------------

    /// Executes `op` on the stacks selected by its operand mask.
    fn execute(&mut self, op: Op) {
        let mask = op.mask();
        match op.operator() {
            Operator::Nop => {},
            Operator::Swap => {
                if mask.a {
                    self.stack_a.swap_top();
                }
                if mask.b {
                    self.stack_b.swap_top();
                }
            },
            Operator::Push => {
                if mask.a {
                    let value = self.stack_b.pop_front();
                    self.stack_a.push_front(value);
                } else {
                    let value = self.stack_a.pop_front();
                    self.stack_b.push_front(value);
                }
            },
            Operator::Rotate => {
                if mask.a {
                    self.stack_a.rotate();
                }
                if mask.b {
                    self.stack_b.rotate();
                }
            },
            Operator::RevRotate => {
                if mask.a {
                    self.stack_a.rev_rotate();
                }
                if mask.b {
                    self.stack_b.rev_rotate();
                }
            },
        }
    }

    // TEST HELPERS
    // --------------------------------------------------------------------------------------------

    /// Returns a recording state with the given stack contents, top first.
    #[cfg(test)]
    pub(crate) fn with_stacks(stack_a: &[i32], stack_b: &[i32]) -> Self {
        let capacity = stack_a.len() + stack_b.len();
        let stack_a = Stack::with_values(capacity, stack_a);
        let stack_b = Stack::with_values(capacity, stack_b);
        let history = vec![Save::capture(&stack_a, &stack_b, Op::Nop)];
        Self {
            stack_a,
            stack_b,
            history,
            bifurcate_point: 0,
            op_count: 0,
            search_depth: 0,
        }
    }
}
