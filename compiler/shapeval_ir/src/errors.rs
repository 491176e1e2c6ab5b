//! Errors raised while a compiled expression runs.
//!
//! Native member and method bodies return these too, so the type lives next
//! to the node model rather than in the evaluator. Factory functions are the
//! preferred way to build them; they keep message construction off the hot
//! path (`#[cold]`).

use thiserror::Error;

use crate::{BinaryOp, Name, Ty, UnaryOp, Value};

/// Result of running compiled code or a native body.
pub type RuntimeResult = Result<Value, RuntimeError>;

/// Failure during execution of a compiled expression.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("null reference: cannot access `{member}` on null")]
    NullReference { member: Name },

    #[error("object of type `{class}` has no field `{field}`")]
    MissingField { class: Name, field: Name },

    #[error("cannot convert a value of type `{from}` to `{to}`")]
    InvalidCast { from: Ty, to: Ty },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },

    #[error("operator `{op}` cannot be applied to `{left}` and `{right}`")]
    InvalidOperands { op: BinaryOp, left: Ty, right: Ty },

    #[error("operator `{op}` cannot be applied to `{operand}`")]
    InvalidOperand { op: UnaryOp, operand: Ty },

    #[error("expected {expected} argument(s), got {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// A native member or method body failed.
    #[error("{message}")]
    Thrown { message: String },
}

impl RuntimeError {
    /// Error raised by a host-provided body.
    pub fn thrown(message: impl Into<String>) -> Self {
        RuntimeError::Thrown {
            message: message.into(),
        }
    }
}

#[cold]
pub fn null_reference(member: &Name) -> RuntimeError {
    RuntimeError::NullReference {
        member: member.clone(),
    }
}

#[cold]
pub fn missing_field(class: &Name, field: &Name) -> RuntimeError {
    RuntimeError::MissingField {
        class: class.clone(),
        field: field.clone(),
    }
}

#[cold]
pub fn invalid_cast(value: &Value, to: &Ty) -> RuntimeError {
    RuntimeError::InvalidCast {
        from: Ty::of(value),
        to: to.clone(),
    }
}

#[cold]
pub fn division_by_zero() -> RuntimeError {
    RuntimeError::DivisionByZero
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> RuntimeError {
    RuntimeError::IntegerOverflow { operation }
}

#[cold]
pub fn invalid_operands(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidOperands {
        op,
        left: Ty::of(left),
        right: Ty::of(right),
    }
}

#[cold]
pub fn invalid_operand(op: UnaryOp, operand: &Value) -> RuntimeError {
    RuntimeError::InvalidOperand {
        op,
        operand: Ty::of(operand),
    }
}

#[cold]
pub fn arity_mismatch(expected: usize, found: usize) -> RuntimeError {
    RuntimeError::ArityMismatch { expected, found }
}
