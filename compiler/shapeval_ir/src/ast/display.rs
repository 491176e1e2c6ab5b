//! Canonical shape printing.
//!
//! The rendering is the structural signature the evaluator caches compiled
//! functions under, so it has to be a faithful function of shape:
//! - every node kind has a distinct, fully parenthesised form;
//! - literals keep their kind (`5` vs `5.0` vs `"5"`);
//! - member and method references always carry their declaring type, and
//!   instance ones their target as well;
//! - parameters carry their static type;
//! - host names print bare only when they are plain identifiers;
//! - captured objects print as class plus identity, never contents.

use std::fmt;

use shapeval_stack::ensure_sufficient_stack;

use super::Expr;
use crate::Name;

/// A host-supplied name in a shape.
struct Ident<'a>(&'a Name);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_identifier() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{:?}", self.0.as_str())
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Expr::Constant(value) => write!(f, "{value}"),
            Expr::Parameter(param) => write!(f, "({}: {})", Ident(param.name()), param.ty()),
            Expr::Convert { operand, ty } => write!(f, "({operand} as {ty})"),
            Expr::Member {
                target: Some(target),
                member,
            } => write!(
                f,
                "{target}.{}::{}",
                member.declaring_type(),
                Ident(member.name())
            ),
            Expr::Member {
                target: None,
                member,
            } => write!(f, "{}::{}", member.declaring_type(), Ident(member.name())),
            Expr::Call {
                target,
                method,
                args,
            } => {
                if let Some(target) = target {
                    write!(f, "{target}.")?;
                }
                write!(f, "{}::{}(", method.declaring_type(), Ident(method.name()))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Unary { op, operand } => write!(f, "({op}{operand})"),
            Expr::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            Expr::Conditional {
                test,
                then,
                otherwise,
            } => write!(f, "({test} ? {then} : {otherwise})"),
        })
    }
}
