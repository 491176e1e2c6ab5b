//! Parameterization: turning a tree into its shape.
//!
//! Every capture anchor is replaced by a fresh placeholder parameter, typed
//! to the declaring type of the member or method it anchors. The rewritten
//! tree no longer mentions any captured value, so it depends only on
//! structure and literals, and two trees that differ only in what they
//! captured rewrite to trees that print identically.
//!
//! Placeholders are named `$0`, `$1`, ... in the order they are created.
//! Creation order matches the visit order of [`crate::collect_captures`]:
//! a call's receiver placeholder is created before its arguments are
//! rewritten. Keep the two in lockstep; the compiled function binds the
//! captures positionally.

use shapeval_ir::{walk_rewrite, Expr, Param, Rewriter, Ty};
use shapeval_stack::ensure_sufficient_stack;

/// A tree with its capture anchors replaced by placeholders.
#[derive(Clone, Debug)]
pub struct Parameterized {
    pub body: Expr,
    /// One placeholder per capture anchor, in creation order.
    pub placeholders: Vec<Param>,
}

/// Replace every capture anchor of `expr` with a typed placeholder.
///
/// The input is not modified. Nodes that are not anchors are rebuilt from
/// their rewritten children, so a member chain like `scope.outer.val`
/// rewrites to `($0: Scope).Scope::outer.Outer::val`.
pub fn parameterize(expr: &Expr) -> Parameterized {
    let mut parameterizer = Parameterizer {
        placeholders: Vec::new(),
    };
    let body = parameterizer.rewrite_expr(expr);
    Parameterized {
        body,
        placeholders: parameterizer.placeholders,
    }
}

struct Parameterizer {
    placeholders: Vec<Param>,
}

impl Parameterizer {
    fn placeholder(&mut self, ty: &Ty) -> Expr {
        let param = Param::new(format!("${}", self.placeholders.len()), ty.clone());
        let expr = Expr::parameter(&param);
        self.placeholders.push(param);
        expr
    }
}

impl Rewriter for Parameterizer {
    fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
        ensure_sufficient_stack(|| match expr {
            Expr::Member {
                target: Some(target),
                member,
            } if target.is_constant() => {
                Expr::member(self.placeholder(member.declaring_type()), member)
            }
            Expr::Call {
                target: Some(target),
                method,
                args,
            } if target.is_constant() => {
                let receiver = self.placeholder(method.declaring_type());
                let args = args.iter().map(|arg| self.rewrite_expr(arg)).collect();
                Expr::call(receiver, method, args)
            }
            _ => walk_rewrite(self, expr),
        })
    }
}
