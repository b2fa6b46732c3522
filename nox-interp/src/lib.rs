//! Tree-walking interpreter for parsed programs.

pub mod env;
pub mod error;
pub mod interpreter;
pub mod ops;

pub use error::{DepthKind, RuntimeError};
pub use interpreter::{Interpreter, InterpreterConfig, RunOutcome};
