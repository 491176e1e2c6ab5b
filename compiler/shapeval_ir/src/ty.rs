//! Static types.
//!
//! Types exist for two reasons: the compiler checks that a member or method
//! is applied to a target of its declaring type, and compiled functions cast
//! their untyped (`Any`) arguments to each placeholder's declared type.

use std::fmt;

use crate::errors::{integer_overflow, invalid_cast, RuntimeResult};
use crate::{Name, Value};

/// Static type of an expression.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Ty {
    /// Untyped. Checks against `Any` are deferred to run time.
    Any,
    /// Result type of methods that return nothing (`Value::Null`).
    Void,
    Bool,
    Int,
    Float,
    Str,
    /// A host class, identified by name.
    Named(Name),
}

impl Ty {
    /// Shorthand for `Ty::Named`.
    pub fn named(name: impl Into<Name>) -> Self {
        Ty::Named(name.into())
    }

    /// The static type of a literal value.
    ///
    /// `Null` has no type of its own and is typed `Any`.
    pub fn of(value: &Value) -> Ty {
        match value {
            Value::Null => Ty::Any,
            Value::Bool(_) => Ty::Bool,
            Value::Int(_) => Ty::Int,
            Value::Float(_) => Ty::Float,
            Value::Str(_) => Ty::Str,
            Value::Object(obj) => Ty::Named(obj.class().clone()),
        }
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Ty::Any)
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Int | Ty::Float)
    }

    /// Runtime cast check: can `value` be stored in a slot of this type?
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Ty::Any, _)
            | (Ty::Void | Ty::Str | Ty::Named(_), Value::Null)
            | (Ty::Bool, Value::Bool(_))
            | (Ty::Int, Value::Int(_))
            | (Ty::Float, Value::Float(_))
            | (Ty::Str, Value::Str(_)) => true,
            (Ty::Named(class), Value::Object(obj)) => obj.class() == class,
            _ => false,
        }
    }

    /// Static assignability: equal types, or either side untyped.
    pub fn is_assignable_from(&self, other: &Ty) -> bool {
        self == other || self.is_any() || other.is_any()
    }

    /// Static check for an explicit conversion from `from` to this type.
    ///
    /// Numeric conversions are allowed in both directions on top of plain
    /// assignability.
    pub fn can_convert_from(&self, from: &Ty) -> bool {
        self.is_assignable_from(from) || (self.is_numeric() && from.is_numeric())
    }

    /// Convert `value` to this type at run time.
    ///
    /// `Int -> Float` widens, `Float -> Int` truncates toward zero (and fails
    /// when out of range), everything else must already be accepted.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        reason = "explicit numeric conversion mirrors `as` semantics with a range check"
    )]
    pub fn convert(&self, value: Value) -> RuntimeResult {
        match (self, value) {
            (Ty::Float, Value::Int(n)) => Ok(Value::Float(n as f64)),
            (Ty::Int, Value::Float(x)) => {
                let truncated = x.trunc();
                if truncated.is_finite()
                    && truncated >= i64::MIN as f64
                    && truncated < i64::MAX as f64
                {
                    Ok(Value::Int(truncated as i64))
                } else {
                    Err(integer_overflow("float to int conversion"))
                }
            }
            (ty, value) if ty.accepts(&value) => Ok(value),
            (ty, value) => Err(invalid_cast(&value, ty)),
        }
    }
}

/// Spellings of the primitive types. A class with one of these names prints
/// quoted so it can never be read back as the primitive.
const PRIMITIVE_NAMES: [&str; 6] = ["any", "void", "bool", "int", "float", "str"];

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Any => f.write_str("any"),
            Ty::Void => f.write_str("void"),
            Ty::Bool => f.write_str("bool"),
            Ty::Int => f.write_str("int"),
            Ty::Float => f.write_str("float"),
            Ty::Str => f.write_str("str"),
            Ty::Named(name)
                if name.is_identifier() && !PRIMITIVE_NAMES.contains(&name.as_str()) =>
            {
                write!(f, "{name}")
            }
            Ty::Named(name) => write!(f, "{:?}", name.as_str()),
        }
    }
}
