//! Host object model shared by the integration tests.
//!
//! Mirrors a small host program:
//! - `Outer { Val1: int, Flag: bool, Inner: Inner }` with `GetVal1()`
//! - `Inner { Val2: int }` with `GetVal2()`
//! - `Tests`, the class whose instance methods build the expressions, with
//!   instance state, instance methods, and static members
//! - closure environments, one class per lambda, holding captured locals

#![allow(dead_code, reason = "each test binary uses a different subset")]

use shapeval_ir::{
    Expr, Member, Method, Name, ObjectRef, RuntimeError, RuntimeResult, Ty, Value,
};

pub const OUTER: &str = "Outer";
pub const INNER: &str = "Inner";
pub const TESTS: &str = "Tests";

/// Read `field` from an object receiver.
fn field_of(receiver: &Value, field: &str) -> RuntimeResult {
    receiver
        .as_object()
        .and_then(|obj| obj.get(field))
        .ok_or_else(|| RuntimeError::thrown(format!("receiver has no `{field}`")))
}

/// Member and method descriptors of the host model.
pub struct Model {
    pub val1: Member,
    pub flag: Member,
    pub inner: Member,
    pub get_val1: Method,

    pub val2: Member,
    pub get_val2: Method,

    pub instance_property: Member,
    pub get_instance_value: Method,
    pub get_predefined_outer: Method,
    pub increment: Method,
    pub static_get5: Method,
    pub static_property_with_5_val: Member,
}

impl Model {
    pub fn new() -> Self {
        Model {
            val1: Member::field(OUTER, "Val1", Ty::Int),
            flag: Member::field(OUTER, "Flag", Ty::Bool),
            inner: Member::field(OUTER, "Inner", Ty::named(INNER)),
            get_val1: Method::instance(OUTER, "GetVal1", vec![], Ty::Int, |this, _| {
                field_of(this, "Val1")
            }),

            val2: Member::field(INNER, "Val2", Ty::Int),
            get_val2: Method::instance(INNER, "GetVal2", vec![], Ty::Int, |this, _| {
                field_of(this, "Val2")
            }),

            instance_property: Member::field(TESTS, "InstanceProperty", Ty::Int),
            get_instance_value: Method::instance(
                TESTS,
                "GetInstanceValue",
                vec![],
                Ty::Int,
                |this, _| field_of(this, "_instanceValue"),
            ),
            get_predefined_outer: Method::instance(
                TESTS,
                "GetPredefinedOuter",
                vec![],
                Ty::named(OUTER),
                |this, _| field_of(this, "_predefinedOuter"),
            ),
            increment: Method::instance(TESTS, "Increment", vec![Ty::Int], Ty::Int, |_, args| {
                match args.first() {
                    Some(Value::Int(n)) => Ok(Value::Int(n + 1)),
                    _ => Err(RuntimeError::thrown("Increment expects an int")),
                }
            }),
            static_get5: Method::static_fn(TESTS, "StaticGet5", vec![], Ty::Int, |_| {
                Ok(Value::Int(5))
            }),
            static_property_with_5_val: Member::static_property(
                TESTS,
                "StaticPropertyWith5Val",
                Ty::Int,
                || Ok(Value::Int(5)),
            ),
        }
    }
}

pub fn outer() -> ObjectRef {
    ObjectRef::new(OUTER)
        .with_field("Val1", 0)
        .with_field("Flag", false)
        .with_field("Inner", Value::Null)
}

pub fn inner(val2: i64) -> ObjectRef {
    ObjectRef::new(INNER).with_field("Val2", val2)
}

/// The `Tests` instance, `this` in expressions built by its methods.
pub fn this() -> ObjectRef {
    ObjectRef::new(TESTS)
        .with_field("InstanceProperty", 0)
        .with_field("_instanceValue", 0)
        .with_field("_predefinedOuter", Value::Null)
}

/// A closure environment of class `class` holding the given captured locals.
///
/// Each lambda gets its own class, so a (class, local) pair always names a
/// single field with a single type.
pub fn closure(class: &str, locals: &[(&str, Value)]) -> ObjectRef {
    locals
        .iter()
        .fold(ObjectRef::new(class), |env, (name, value)| {
            env.with_field(*name, value.clone())
        })
}

/// Descriptor of a captured local on the environment class `class`.
pub fn local(class: &Name, name: &str, ty: Ty) -> Member {
    Member::field(class.clone(), name, ty)
}

/// `env.name`: a read of a captured local.
pub fn captured(env: &ObjectRef, name: &str, ty: Ty) -> Expr {
    Expr::member(Expr::constant(env.clone()), &local(env.class(), name, ty))
}
