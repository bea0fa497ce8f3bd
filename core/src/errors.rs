// INPUT ERROR
// ================================================================================================

/// Errors arising from malformed program inputs.
///
/// These are the only recoverable errors in the system: everything past input validation is
/// either a pure computation or a programmer error enforced with assertions.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("input must contain at least one value")]
    Empty,
    #[error("duplicate value {0} in input")]
    DuplicateValue(i32),
}
