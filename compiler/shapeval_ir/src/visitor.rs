//! Tree walkers.
//!
//! Two traits are provided:
//! - [`Visitor`] walks a tree read-only; the visitor mutates its own state.
//! - [`Rewriter`] walks a tree and builds a new one.
//!
//! Default implementations call the `walk_*` functions, which visit children
//! in a fixed order: member/call target first, then call arguments left to
//! right, then binary left before right, then conditional test, then, else.
//! Evaluation-order-sensitive passes (capture collection and placeholder
//! numbering) rely on that order being identical in both walks.
//!
//! # Example
//!
//! ```text
//! struct CountCalls {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_expr(&mut self, expr: &'ast Expr) {
//!         if let Expr::Call { .. } = expr {
//!             self.count += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use shapeval_stack::ensure_sufficient_stack;

use crate::Expr;

/// Read-only tree visitor.
pub trait Visitor<'ast> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

/// Visit the children of `expr`.
pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    ensure_sufficient_stack(|| match expr {
        Expr::Constant(_) | Expr::Parameter(_) => {}
        Expr::Convert { operand, .. } | Expr::Unary { operand, .. } => {
            visitor.visit_expr(operand);
        }
        Expr::Member { target, .. } => {
            if let Some(target) = target {
                visitor.visit_expr(target);
            }
        }
        Expr::Call { target, args, .. } => {
            if let Some(target) = target {
                visitor.visit_expr(target);
            }
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Conditional {
            test,
            then,
            otherwise,
        } => {
            visitor.visit_expr(test);
            visitor.visit_expr(then);
            visitor.visit_expr(otherwise);
        }
    });
}

/// Rebuilding tree walker.
pub trait Rewriter {
    fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
        walk_rewrite(self, expr)
    }
}

/// Rebuild `expr` from its rewritten children.
///
/// Leaves are cloned; descriptors and values are shared handles, so this
/// never deep-copies host state.
pub fn walk_rewrite<R: Rewriter + ?Sized>(rewriter: &mut R, expr: &Expr) -> Expr {
    ensure_sufficient_stack(|| match expr {
        Expr::Constant(_) | Expr::Parameter(_) => expr.clone(),
        Expr::Convert { operand, ty } => Expr::convert(rewriter.rewrite_expr(operand), ty.clone()),
        Expr::Member { target, member } => Expr::Member {
            target: target
                .as_ref()
                .map(|target| Box::new(rewriter.rewrite_expr(target))),
            member: member.clone(),
        },
        Expr::Call {
            target,
            method,
            args,
        } => {
            let target = target
                .as_ref()
                .map(|target| Box::new(rewriter.rewrite_expr(target)));
            let args = args.iter().map(|arg| rewriter.rewrite_expr(arg)).collect();
            Expr::Call {
                target,
                method: method.clone(),
                args,
            }
        }
        Expr::Unary { op, operand } => Expr::unary(*op, rewriter.rewrite_expr(operand)),
        Expr::Binary { op, left, right } => {
            let left = rewriter.rewrite_expr(left);
            let right = rewriter.rewrite_expr(right);
            Expr::binary(*op, left, right)
        }
        Expr::Conditional {
            test,
            then,
            otherwise,
        } => {
            let test = rewriter.rewrite_expr(test);
            let then = rewriter.rewrite_expr(then);
            let otherwise = rewriter.rewrite_expr(otherwise);
            Expr::conditional(test, then, otherwise)
        }
    })
}
