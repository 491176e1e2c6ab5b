//! Operator typing and evaluation.
//!
//! The compiler consults the `*_result_ty` functions to type a node before
//! lowering it; the compiled closures call `evaluate_*` at run time. The type
//! set is fixed, so dispatch is a direct match on value pairs.
//!
//! `Any` on either side of a static check defers it to run time, where a
//! mismatched pair fails with `InvalidOperands`.

use std::cmp::Ordering;

use shapeval_ir::{
    division_by_zero, integer_overflow, invalid_operand, invalid_operands, BinaryOp,
    RuntimeResult, Ty, UnaryOp, Value,
};

// Static typing

/// Result type of `op operand`, or `None` if the operator does not apply.
pub(super) fn unary_result_ty(op: UnaryOp, operand: &Ty) -> Option<Ty> {
    match (op, operand) {
        (UnaryOp::Not, Ty::Any | Ty::Bool) => Some(Ty::Bool),
        (UnaryOp::Neg, Ty::Any) => Some(Ty::Any),
        (UnaryOp::Neg, Ty::Int) => Some(Ty::Int),
        (UnaryOp::Neg, Ty::Float) => Some(Ty::Float),
        _ => None,
    }
}

/// Result type of `left op right`, or `None` if the operator does not apply.
pub(super) fn binary_result_ty(op: BinaryOp, left: &Ty, right: &Ty) -> Option<Ty> {
    if op.is_logical() {
        let is_bool = |ty: &Ty| matches!(ty, Ty::Any | Ty::Bool);
        return (is_bool(left) && is_bool(right)).then_some(Ty::Bool);
    }
    if op.is_equality() {
        return left.is_assignable_from(right).then_some(Ty::Bool);
    }

    let operand = match (left, right) {
        (Ty::Any, Ty::Any) => Ty::Any,
        (Ty::Any, ty) | (ty, Ty::Any) => ty.clone(),
        (l, r) if l == r => l.clone(),
        _ => return None,
    };
    let applies = match operand {
        Ty::Any | Ty::Int | Ty::Float => true,
        Ty::Str => op == BinaryOp::Add || op.is_ordering(),
        _ => false,
    };
    if !applies {
        return None;
    }
    if op.is_ordering() {
        Some(Ty::Bool)
    } else {
        Some(operand)
    }
}

// Runtime evaluation

#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> RuntimeResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

#[inline]
fn checked_div<F>(is_zero: bool, op: F, op_name: &'static str) -> RuntimeResult
where
    F: FnOnce() -> Option<i64>,
{
    if is_zero {
        Err(division_by_zero())
    } else {
        op().map(Value::Int).ok_or_else(|| integer_overflow(op_name))
    }
}

/// Evaluate a non-short-circuiting binary operation.
///
/// Equality falls back to [`Value`]'s `PartialEq` for mixed or reference
/// operands, so `null == obj` and `obj == obj` work for any pair.
#[allow(
    clippy::needless_pass_by_value,
    reason = "compiled closures produce owned values; taking them avoids a clone at every call"
)]
pub(crate) fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> RuntimeResult {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Bool(a), Value::Bool(b)) => eval_bool_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        _ if op == BinaryOp::Eq => Ok(Value::Bool(left == right)),
        _ if op == BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        _ => Err(invalid_operands(op, &left, &right)),
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> RuntimeResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div => checked_div(b == 0, || a.checked_div(b), "division"),
        BinaryOp::Mod => checked_div(b == 0, || a.checked_rem(b), "remainder"),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::And | BinaryOp::Or => Err(invalid_operands(op, &Value::Int(a), &Value::Int(b))),
    }
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> RuntimeResult {
    let ordering = a.partial_cmp(&b);
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        // IEEE 754: NaN compares unequal to everything, -0.0 == 0.0
        BinaryOp::Eq => Ok(Value::Bool(ordering == Some(Ordering::Equal))),
        BinaryOp::NotEq => Ok(Value::Bool(ordering != Some(Ordering::Equal))),
        BinaryOp::Lt => Ok(Value::Bool(ordering == Some(Ordering::Less))),
        BinaryOp::LtEq => Ok(Value::Bool(matches!(
            ordering,
            Some(Ordering::Less | Ordering::Equal)
        ))),
        BinaryOp::Gt => Ok(Value::Bool(ordering == Some(Ordering::Greater))),
        BinaryOp::GtEq => Ok(Value::Bool(matches!(
            ordering,
            Some(Ordering::Greater | Ordering::Equal)
        ))),
        BinaryOp::And | BinaryOp::Or => {
            Err(invalid_operands(op, &Value::Float(a), &Value::Float(b)))
        }
    }
}

fn eval_bool_binary(a: bool, b: bool, op: BinaryOp) -> RuntimeResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::And => Ok(Value::Bool(a && b)),
        BinaryOp::Or => Ok(Value::Bool(a || b)),
        _ => Err(invalid_operands(op, &Value::Bool(a), &Value::Bool(b))),
    }
}

fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> RuntimeResult {
    match op {
        BinaryOp::Add => Ok(Value::string(format!("{a}{b}"))),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        // Lexicographic
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        _ => Err(invalid_operands(op, &Value::string(a), &Value::string(b))),
    }
}

/// Evaluate a unary operation.
pub(crate) fn evaluate_unary(op: UnaryOp, value: Value) -> RuntimeResult {
    match (op, &value) {
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => Err(invalid_operand(op, &value)),
    }
}
