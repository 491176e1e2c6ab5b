//! Capture classification.
//!
//! A *capture anchor* is a `Constant` node sitting in the target position of
//! an instance `Member` read or an instance `Call`. That is how a host
//! expresses a value taken from outside the expression: a closure
//! environment object, or the `self` of the enclosing method. The constant's
//! value is the *captured value*.
//!
//! Constants anywhere else (operands, arguments, branches) are literals.
//! Literals are part of the shape; captured values are not.

use shapeval_ir::{walk_expr, Expr, Value, Visitor};
use smallvec::SmallVec;

/// Captured values in evaluation order.
///
/// The common case is one to three captures, so they live inline.
pub type Captures = SmallVec<[Value; 4]>;

/// Collect the captured values of `expr`, in the order the placeholders of
/// [`crate::parameterize`] are numbered.
///
/// Only anchors are collected: the target of a member read whose own target
/// is a member read (`scope.outer.val`) is not a constant, so only `scope`
/// counts. Repeated anchors on the same object are collected once per
/// occurrence.
pub fn collect_captures(expr: &Expr) -> Captures {
    let mut collector = CaptureCollector {
        captures: Captures::new(),
    };
    collector.visit_expr(expr);
    collector.captures
}

struct CaptureCollector {
    captures: Captures,
}

impl<'ast> Visitor<'ast> for CaptureCollector {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Member {
                target: Some(target),
                ..
            }
            | Expr::Call {
                target: Some(target),
                ..
            } => {
                if let Expr::Constant(value) = &**target {
                    self.captures.push(value.clone());
                }
            }
            _ => {}
        }
        walk_expr(self, expr);
    }
}
