//! Arithmetic on runtime values.

use crate::RuntimeError;
use nox_parser::ast::{BinaryOp, UnaryOp};
use nox_value::Value;

pub fn unary(op: UnaryOp, operand: Value) -> Result<Value, RuntimeError> {
    match (op, operand) {
        (UnaryOp::Plus, val @ Value::Int(_)) | (UnaryOp::Plus, val @ Value::Float(_)) => Ok(val),
        (UnaryOp::Minus, Value::Int(val)) => Ok(Value::Int(val.wrapping_neg())),
        (UnaryOp::Minus, Value::Float(val)) => Ok(Value::Float(-val)),
        (op, operand) => Err(RuntimeError::Type(format!(
            "bad operand type for unary `{}`: {}",
            op,
            operand.type_name()
        ))),
    }
}

/// Ints stay ints; a float on either side promotes both operands to float.
pub fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        return int_binary(op, *a, *b);
    }
    match (lhs.cast_to_float(), rhs.cast_to_float()) {
        (Some(a), Some(b)) => float_binary(op, a, b),
        _ => Err(RuntimeError::Type(format!(
            "unsupported operand types for `{}`: {} and {}",
            op,
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

fn int_binary(op: BinaryOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    let val = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mult => a.wrapping_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            a.wrapping_div(b)
        }
    };
    Ok(Value::Int(val))
}

fn float_binary(op: BinaryOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
    let val = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mult => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            a / b
        }
    };
    Ok(Value::Float(val))
}
