//! Expression nodes.
//!
//! `Expr` is the tree a host hands to the evaluator. Trees are immutable
//! once built; rewriting produces a new tree (see [`crate::visitor`]).
//!
//! # Node kinds
//!
//! - `Constant`: a literal, or a captured host object
//! - `Parameter`: a formal parameter, bound by handle identity
//! - `Convert`: explicit conversion to a static type
//! - `Member`: field/property read, `target` absent for static properties
//! - `Call`: method call, `target` absent for static methods
//! - `Unary`, `Binary`, `Conditional`: composite nodes
//!
//! A `Constant` holding an object and sitting in the target position of a
//! `Member` or `Call` is how a host expresses a value captured from outside
//! the expression (a closure environment, or `self`).

mod display;
mod operators;

pub use operators::{BinaryOp, UnaryOp};

use crate::{Member, Method, Param, Ty, Value};

/// Expression tree node.
#[derive(Clone, Debug)]
pub enum Expr {
    Constant(Value),
    Parameter(Param),
    Convert {
        operand: Box<Expr>,
        ty: Ty,
    },
    Member {
        target: Option<Box<Expr>>,
        member: Member,
    },
    Call {
        target: Option<Box<Expr>>,
        method: Method,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

// Constructors

impl Expr {
    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn null() -> Self {
        Expr::Constant(Value::Null)
    }

    pub fn parameter(param: &Param) -> Self {
        Expr::Parameter(param.clone())
    }

    pub fn convert(operand: Expr, ty: Ty) -> Self {
        Expr::Convert {
            operand: Box::new(operand),
            ty,
        }
    }

    /// Instance member read: `target.member`.
    pub fn member(target: Expr, member: &Member) -> Self {
        Expr::Member {
            target: Some(Box::new(target)),
            member: member.clone(),
        }
    }

    /// Static property read: `Type::member`.
    pub fn static_member(member: &Member) -> Self {
        Expr::Member {
            target: None,
            member: member.clone(),
        }
    }

    /// Instance call: `target.method(args)`.
    pub fn call(target: Expr, method: &Method, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: Some(Box::new(target)),
            method: method.clone(),
            args,
        }
    }

    /// Static call: `Type::method(args)`.
    pub fn static_call(method: &Method, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: None,
            method: method.clone(),
            args,
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::unary(UnaryOp::Not, operand)
    }

    pub fn neg(operand: Expr) -> Self {
        Expr::unary(UnaryOp::Neg, operand)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn conditional(test: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }
}

// Queries

impl Expr {
    /// The literal value, when this node is a `Constant`.
    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            Expr::Constant(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, Expr::Constant(_))
    }
}
