//! Snarky is the front end to our circuits, allowing users to write programs and convert them to rank-1 constraint systems.
//!
//! A circuit is written once, against a [checked_runner::RunState].
//! Run without a witness, it records the constraints. Run with a witness, it computes
//! the value of every variable and checks the constraints as they are emitted.

pub mod api;
pub mod boolean;
pub mod checked_runner;
pub mod constraint_system;
pub mod cvar;
pub mod errors;
pub mod traits;

/// A handy module that you can import the content of to easily use snarky.
pub mod prelude {
    use super::*;
    pub use crate::loc;
    pub use api::{CompiledCircuit, SnarkyCircuit, Witness};
    pub use boolean::Boolean;
    pub use checked_runner::{RunState, WitnessGeneration};
    pub use cvar::FieldVar;
    pub use errors::{SnarkyCompilationError, SnarkyError, SnarkyResult, SnarkyRuntimeError};
    pub use traits::{CircuitOutput, SnarkyType};
}
