//! Runtime values and the native function table.

pub mod native;

pub use native::{Builtins, NativeError, NativeFn};

use std::fmt;

/// A runtime value. Values are copied on assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Name of the value's type, as shown in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }

    /// Attempts to cast the `Value` into an `i64` or `None` if wrong type.
    pub fn cast_to_int(&self) -> Option<i64> {
        match self {
            Value::Int(val) => Some(*val),
            _ => None,
        }
    }

    /// Attempts to cast the `Value` into an `f64`, promoting ints. Returns `None` if not numeric.
    pub fn cast_to_float(&self) -> Option<f64> {
        match self {
            Value::Int(val) => Some(*val as f64),
            Value::Float(val) => Some(*val),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(val) => write!(f, "{}", val),
            // Debug keeps the fractional part (`2.0` rather than `2`).
            Value::Float(val) => write!(f, "{:?}", val),
            Value::String(val) => write!(f, "{}", val),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::String("hi\n".to_string()).to_string(), "hi\n");
    }

    #[test]
    fn casts() {
        assert_eq!(Value::Int(3).cast_to_float(), Some(3.0));
        assert_eq!(Value::Float(3.5).cast_to_int(), None);
        assert_eq!(Value::String("s".to_string()).cast_to_float(), None);
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Float(1.0).type_name(), "float");
    }
}
