//! Runtime values.
//!
//! # Thread Safety
//!
//! `Value` is `Send + Sync`. Objects are shared through `ObjectRef`, an
//! `Arc` over a `parking_lot::RwLock`-guarded field map, so a compiled
//! function running on one thread observes field writes made on another.
//! That sharing is what lets a cached shape pick up a captured variable's
//! new value on the next call.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Runtime value flowing through compiled expressions.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Object(ObjectRef),
}

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Structural equality for scalars, identity for objects.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            #[allow(clippy::float_cmp, reason = "IEEE 754 equality is the intended semantics")]
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Literal rendering, as it appears inside a shape signature.
///
/// Floats always carry a decimal point so `5` and `5.0` stay distinct;
/// strings are quoted and escaped.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{:?}", &**s),
            Value::Object(obj) => write!(f, "{obj:?}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

/// Shared handle to a host object.
///
/// Cloning the handle shares the object. Field reads clone the stored
/// value out from under a read lock; writes take the write lock briefly.
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

struct Object {
    class: Name,
    fields: RwLock<FxHashMap<Name, Value>>,
}

impl ObjectRef {
    /// Create an object of `class` with no fields.
    pub fn new(class: impl Into<Name>) -> Self {
        ObjectRef(Arc::new(Object {
            class: class.into(),
            fields: RwLock::new(FxHashMap::default()),
        }))
    }

    /// Builder-style field initialisation.
    #[must_use]
    pub fn with_field(self, field: impl Into<Name>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    #[inline]
    pub fn class(&self) -> &Name {
        &self.0.class
    }

    /// Read a field, cloning its current value.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.0.fields.read().get(field).cloned()
    }

    /// Write (or add) a field.
    pub fn set(&self, field: impl Into<Name>, value: impl Into<Value>) {
        self.0.fields.write().insert(field.into(), value.into());
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Class and identity only; field contents are never printed, since this
/// rendering ends up in shape signatures.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}@{:p}>", self.0.class, Arc::as_ptr(&self.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
