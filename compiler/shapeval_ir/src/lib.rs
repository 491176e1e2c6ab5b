//! Shapeval IR - the expression node model.
//!
//! This crate contains the data a host hands to the evaluator:
//! - `Value` and `ObjectRef` for runtime values and shared mutable objects
//! - `Ty` for static types (with `Any` as the untyped boundary type)
//! - `Member` and `Method` descriptors (fields, static properties, native methods)
//! - `Param` handles bound by identity
//! - `Expr`, a closed sum type over node kinds
//! - `Visitor` and `Rewriter` for read-only and rebuilding walks
//!
//! # Design Philosophy
//!
//! - **Closed node set**: `Expr` is an enum; every walk is an exhaustive match.
//! - **Canonical printing**: `Display for Expr` is the shape encoding used as
//!   the compiled-function cache key, so it never prints the contents of a
//!   captured object, only its identity.
//! - **Shared handles**: `ObjectRef`, `Member`, `Method` and `Param` are `Arc`
//!   handles; cloning a tree never deep-copies host state.

mod ast;
mod errors;
mod member;
mod name;
mod param;
mod ty;
mod value;
pub mod visitor;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use errors::{
    arity_mismatch, division_by_zero, integer_overflow, invalid_cast, invalid_operand,
    invalid_operands, missing_field, null_reference, RuntimeError, RuntimeResult,
};
pub use member::{Member, Method};
pub use name::Name;
pub use param::Param;
pub use ty::Ty;
pub use value::{ObjectRef, Value};
pub use visitor::{walk_expr, walk_rewrite, Rewriter, Visitor};
