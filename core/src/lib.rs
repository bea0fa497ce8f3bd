#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod errors;
pub use errors::InputError;

pub mod operation;
pub use operation::{Op, OperandMask, Operator};

pub mod stack;
pub use stack::Stack;
