//! Native (built-in) functions callable from scripts.

use crate::Value;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::ops::RangeInclusive;

/// Signature shared by all native functions. `out` is the interpreter's output sink.
pub type NativeFnPtr = fn(out: &mut dyn Write, args: &[Value]) -> Result<Value, NativeError>;

/// Raised by a native function to abort the call.
#[derive(Debug, thiserror::Error)]
pub enum NativeError {
    /// Not a failure: the script asked to terminate with this status.
    #[error("exit requested with status {0}")]
    Exit(i32),
    #[error("{0}")]
    Type(String),
    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Clone)]
pub struct NativeFn {
    pub ident: String,
    /// Accepted argument counts.
    pub arity: RangeInclusive<usize>,
    pub func: NativeFnPtr,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.ident)
    }
}

/// Table of native functions, keyed by name.
/// Filled once before evaluation and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    values: HashMap<String, NativeFn>,
}

impl Builtins {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `func` under `ident`, replacing any previous entry.
    pub fn add_native_fn(&mut self, ident: &str, func: NativeFnPtr, arity: RangeInclusive<usize>) {
        self.values.insert(
            ident.to_string(),
            NativeFn {
                ident: ident.to_string(),
                arity,
                func,
            },
        );
    }

    pub fn get(&self, ident: &str) -> Option<&NativeFn> {
        self.values.get(ident)
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.values.contains_key(ident)
    }
}
