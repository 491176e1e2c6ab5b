//! Fixtures shared by the unit tests.

use shapeval_ir::{Expr, Member, Method, ObjectRef, RuntimeError, Ty, Value};

/// A closure environment object with a single field.
pub(crate) fn scope(field: &str, value: impl Into<Value>) -> ObjectRef {
    ObjectRef::new("Scope").with_field(field, value)
}

pub(crate) fn scope_field(name: &str, ty: Ty) -> Member {
    Member::field("Scope", name, ty)
}

/// `scope.member`, with `scope` as a capture anchor.
pub(crate) fn captured(scope: &ObjectRef, member: &Member) -> Expr {
    Expr::member(Expr::constant(scope.clone()), member)
}

/// `Math::Add(int, int) -> int`
pub(crate) fn math_add() -> Method {
    Method::static_fn("Math", "Add", vec![Ty::Int, Ty::Int], Ty::Int, |args| {
        match (args[0].as_int(), args[1].as_int()) {
            (Some(a), Some(b)) => Ok(Value::Int(a + b)),
            _ => Err(RuntimeError::thrown("Add expects ints")),
        }
    })
}

/// `Scope.Twice(int) -> int`, reading nothing from the receiver.
pub(crate) fn scope_twice() -> Method {
    Method::instance("Scope", "Twice", vec![Ty::Int], Ty::Int, |_, args| {
        args[0]
            .as_int()
            .map(|n| Value::Int(n * 2))
            .ok_or_else(|| RuntimeError::thrown("Twice expects an int"))
    })
}
