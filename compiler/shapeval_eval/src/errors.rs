//! Evaluator error types.
//!
//! Two layers:
//! - [`CompileError`]: the tree is not well typed and cannot be lowered.
//! - [`EvalError`]: everything [`crate::Evaluator::eval`] can return, which
//!   adds unbound variables and wraps runtime failures unchanged.
//!
//! Build errors through the factory functions below; they are `#[cold]` so
//! message construction stays off the compile fast path.

use shapeval_ir::{BinaryOp, Member, Method, Name, Param, RuntimeError, Ty, UnaryOp, Value};
use thiserror::Error;

/// Result of evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Failure of [`crate::Evaluator::eval`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The tree refers to a parameter the evaluator does not bind, e.g. the
    /// lambda parameter of an enclosing expression.
    #[error("variable `{name}` of type `{ty}` is referenced but not bound")]
    UnboundVariable { name: Name, ty: Ty },

    #[error("compilation failed: {0}")]
    Compilation(#[from] CompileError),

    /// Raised while running compiled code, including errors thrown by native
    /// member and method bodies.
    #[error(transparent)]
    Invocation(#[from] RuntimeError),
}

/// Static type error found while lowering a tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("`{member}` is declared on `{declaring}` but its target has type `{found}`")]
    TargetMismatch {
        member: Name,
        declaring: Ty,
        found: Ty,
    },

    #[error("instance member `{member}` has no target")]
    MissingTarget { member: Name },

    #[error("static member `{member}` cannot have a target")]
    UnexpectedTarget { member: Name },

    #[error("`{method}` takes {expected} argument(s) but {found} were supplied")]
    ArityMismatch {
        method: Name,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of `{method}` must be `{expected}`, found `{found}`")]
    ArgumentMismatch {
        method: Name,
        index: usize,
        expected: Ty,
        found: Ty,
    },

    #[error("no conversion from `{from}` to `{to}`")]
    InvalidConversion { from: Ty, to: Ty },

    #[error("operator `{op}` cannot be applied to `{operand}`")]
    InvalidUnaryOp { op: UnaryOp, operand: Ty },

    #[error("operator `{op}` cannot be applied to `{left}` and `{right}`")]
    InvalidBinaryOp { op: BinaryOp, left: Ty, right: Ty },

    #[error("conditional test must be `bool`, found `{found}`")]
    NonBoolTest { found: Ty },

    #[error("conditional branches have different types: `{then}` and `{otherwise}`")]
    BranchMismatch { then: Ty, otherwise: Ty },
}

#[cold]
pub fn unbound_variable(param: &Param) -> EvalError {
    EvalError::UnboundVariable {
        name: param.name().clone(),
        ty: param.ty().clone(),
    }
}

#[cold]
pub fn member_target_mismatch(member: &Member, found: &Ty) -> EvalError {
    CompileError::TargetMismatch {
        member: member.name().clone(),
        declaring: member.declaring_type().clone(),
        found: found.clone(),
    }
    .into()
}

#[cold]
pub fn method_target_mismatch(method: &Method, found: &Ty) -> EvalError {
    CompileError::TargetMismatch {
        member: method.name().clone(),
        declaring: method.declaring_type().clone(),
        found: found.clone(),
    }
    .into()
}

#[cold]
pub fn missing_target(member: &Name) -> EvalError {
    CompileError::MissingTarget {
        member: member.clone(),
    }
    .into()
}

#[cold]
pub fn unexpected_target(member: &Name) -> EvalError {
    CompileError::UnexpectedTarget {
        member: member.clone(),
    }
    .into()
}

#[cold]
pub fn call_arity_mismatch(method: &Method, found: usize) -> EvalError {
    CompileError::ArityMismatch {
        method: method.name().clone(),
        expected: method.params().len(),
        found,
    }
    .into()
}

#[cold]
pub fn argument_mismatch(method: &Method, index: usize, expected: &Ty, found: &Ty) -> EvalError {
    CompileError::ArgumentMismatch {
        method: method.name().clone(),
        index,
        expected: expected.clone(),
        found: found.clone(),
    }
    .into()
}

#[cold]
pub fn invalid_conversion(from: &Ty, to: &Ty) -> EvalError {
    CompileError::InvalidConversion {
        from: from.clone(),
        to: to.clone(),
    }
    .into()
}

#[cold]
pub fn invalid_unary_op(op: UnaryOp, operand: &Ty) -> EvalError {
    CompileError::InvalidUnaryOp {
        op,
        operand: operand.clone(),
    }
    .into()
}

#[cold]
pub fn invalid_binary_op(op: BinaryOp, left: &Ty, right: &Ty) -> EvalError {
    CompileError::InvalidBinaryOp {
        op,
        left: left.clone(),
        right: right.clone(),
    }
    .into()
}

#[cold]
pub fn non_bool_test(found: &Ty) -> EvalError {
    CompileError::NonBoolTest {
        found: found.clone(),
    }
    .into()
}

#[cold]
pub fn branch_mismatch(then: &Ty, otherwise: &Ty) -> EvalError {
    CompileError::BranchMismatch {
        then: then.clone(),
        otherwise: otherwise.clone(),
    }
    .into()
}
