use std::borrow::Cow;
use thiserror::Error;

/// A result type for Snarky errors.
pub type SnarkyResult<T> = std::result::Result<T, SnarkyError>;

/// A result type for Snarky runtime errors.
pub type SnarkyRuntimeResult<T> = std::result::Result<T, SnarkyRuntimeError>;

/// A result type for Snarky compilation errors.
pub type SnarkyCompileResult<T> = std::result::Result<T, SnarkyCompilationError>;

/// Snarky errors can come from either a compilation or runtime error.
/// A circuit that runs fine but returns something else than expected is an output mismatch.
#[derive(Debug, Clone, Error)]
pub enum SnarkyError {
    #[error("a compilation error occurred: {0}")]
    CompilationError(#[from] SnarkyCompilationError),

    #[error("a runtime error occurred: {0}")]
    RuntimeError(#[from] SnarkyRuntimeError),

    #[error("the circuit output {actual} does not match the expected output {expected}")]
    OutputMismatch { expected: String, actual: String },
}

/// Errors that can occur during compilation of a circuit.
/// These only depend on the circuit parameters, never on the witness.
#[derive(Debug, Clone, Error)]
pub enum SnarkyCompilationError {
    #[error("the two values were not equal: {0} != {1}")]
    ConstantAssertEquals(String, String),

    #[error("unsupported AES key length of {0} bytes (expected 16, 24 or 32)")]
    UnsupportedKeyLength(usize),

    #[error("{what} is {got} bits wide, expected {expected}")]
    WidthMismatch {
        what: Cow<'static, str>,
        expected: usize,
        got: usize,
    },

    #[error("the block counter starting at {initial} overflows 32 bits after {blocks} blocks")]
    CounterOverflow { initial: u32, blocks: usize },

    #[error("the field has {field_bits} bits, at least {needed} are needed")]
    FieldTooSmall { field_bits: u32, needed: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors that can occur during runtime (witness generation).
#[derive(Debug, Clone, Error)]
pub enum SnarkyRuntimeError {
    #[error("unsatisfied constraint `{0}`: {1} is not a boolean (0 or 1)")]
    UnsatisfiedBooleanConstraint(String, String),

    #[error("unsatisfied constraint `{0}`: {1} is not equal to {2}")]
    UnsatisfiedEqualConstraint(String, String, String),

    #[error("unsatisfied constraint `{0}`: {1}^2 is not equal to {2}")]
    UnsatisfiedSquareConstraint(String, String, String),

    #[error("unsatisfied constraint `{0}`: {1} * {2} is not equal to {3}")]
    UnsatisfiedR1CSConstraint(String, String, String, String),

    #[error("{what} has length {got}, the circuit was compiled for {expected}")]
    InputLength {
        what: Cow<'static, str>,
        expected: usize,
        got: usize,
    },

    #[error("the witness computation at {loc} produced {got} values, {expected} were allocated")]
    WitnessShapeMismatch {
        loc: Cow<'static, str>,
        expected: usize,
        got: usize,
    },

    #[error("the witness has {witness} variables, the compiled circuit has {compiled}")]
    VariableCountMismatch { compiled: usize, witness: usize },

    #[error("witness generation at {0} needs an input, none was given")]
    MissingInput(Cow<'static, str>),
}
