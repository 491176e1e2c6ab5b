//! Shape signatures.

use std::fmt;

use shapeval_ir::Expr;

/// Cache key of a shape: the canonical rendering of a tree.
///
/// Computed from parameterized trees (or capture-free trees), so it
/// names structure, literals, member identities and placeholder types, and
/// never the contents of a captured object.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Signature(Box<str>);

impl Signature {
    pub fn of(expr: &Expr) -> Self {
        Signature(expr.to_string().into_boxed_str())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
