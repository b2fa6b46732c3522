//! Runtime error taxonomy.

use std::fmt;
use std::io;
use std::ops::RangeInclusive;

/// Represents an error raised while evaluating a program. Evaluation stops at the first one.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("cannot resolve name `{0}`")]
    Name(String),
    #[error("`{0}` is already declared in this scope")]
    DuplicateDeclaration(String),
    #[error("cannot assign to constant `{0}`")]
    ImmutableAssignment(String),
    #[error("{0}")]
    Type(String),
    #[error("function `{func}` expects {expected} arguments, received {received}")]
    Arity {
        func: String,
        expected: String,
        received: usize,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("maximum {kind} depth of {max} exceeded")]
    Recursion { kind: DepthKind, max: usize },
    #[error("could not write output: {0}")]
    Io(#[source] io::Error),
}

/// The recursion budget that ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthKind {
    /// Nested user function calls.
    Call,
    /// Nested expression evaluations and calls combined.
    Evaluation,
}

impl fmt::Display for DepthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DepthKind::Call => "call",
            DepthKind::Evaluation => "evaluation",
        })
    }
}

impl RuntimeError {
    pub(crate) fn arity(func: &str, accepted: &RangeInclusive<usize>, received: usize) -> Self {
        let expected = if accepted.start() == accepted.end() {
            accepted.start().to_string()
        } else {
            format!("{} to {}", accepted.start(), accepted.end())
        };
        RuntimeError::Arity {
            func: func.to_string(),
            expected,
            received,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_message() {
        assert_eq!(
            RuntimeError::arity("f", &(1..=2), 0).to_string(),
            "function `f` expects 1 to 2 arguments, received 0"
        );
        assert_eq!(
            RuntimeError::arity("g", &(0..=0), 3).to_string(),
            "function `g` expects 0 arguments, received 3"
        );
    }

    #[test]
    fn recursion_message() {
        let err = RuntimeError::Recursion {
            kind: DepthKind::Evaluation,
            max: 512,
        };
        assert_eq!(err.to_string(), "maximum evaluation depth of 512 exceeded");
    }
}
