//! Member and method descriptors.
//!
//! These are the reflection handles a host attaches to `Member` and `Call`
//! nodes: they name the declaring type and carry the native code that reads
//! a field or runs a method. Descriptors are `Arc` handles, so the same
//! descriptor can appear in any number of trees and compiled functions.
//!
//! Within one shape, a descriptor is identified by its declaring type and
//! name. Hosts must not reuse a (type, name) pair for two behaviours.

use std::fmt;
use std::sync::Arc;

use crate::errors::{arity_mismatch, invalid_cast, missing_field, null_reference, RuntimeResult};
use crate::{Name, Ty, Value};

type StaticGetter = dyn Fn() -> RuntimeResult + Send + Sync;
type InstanceBody = dyn Fn(&Value, &[Value]) -> RuntimeResult + Send + Sync;
type StaticBody = dyn Fn(&[Value]) -> RuntimeResult + Send + Sync;

/// A field or property that a `Member` node reads.
#[derive(Clone)]
pub struct Member(Arc<MemberData>);

struct MemberData {
    declaring: Ty,
    name: Name,
    ty: Ty,
    access: Access,
}

enum Access {
    /// Read the field of the same name from the target object.
    Field,
    /// Static property; there is no target.
    Static(Box<StaticGetter>),
}

impl Member {
    /// Instance field `name` of type `ty`, declared on class `declaring`.
    pub fn field(declaring: impl Into<Name>, name: impl Into<Name>, ty: Ty) -> Self {
        Member(Arc::new(MemberData {
            declaring: Ty::Named(declaring.into()),
            name: name.into(),
            ty,
            access: Access::Field,
        }))
    }

    /// Static property whose value is produced by `getter` on every read.
    pub fn static_property(
        declaring: impl Into<Name>,
        name: impl Into<Name>,
        ty: Ty,
        getter: impl Fn() -> RuntimeResult + Send + Sync + 'static,
    ) -> Self {
        Member(Arc::new(MemberData {
            declaring: Ty::Named(declaring.into()),
            name: name.into(),
            ty,
            access: Access::Static(Box::new(getter)),
        }))
    }

    #[inline]
    pub fn declaring_type(&self) -> &Ty {
        &self.0.declaring
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.0.name
    }

    /// Static type of the value the member produces.
    #[inline]
    pub fn ty(&self) -> &Ty {
        &self.0.ty
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self.0.access, Access::Static(_))
    }

    /// Read the member.
    ///
    /// Instance fields require an object target; static properties ignore it.
    pub fn read(&self, target: Option<&Value>) -> RuntimeResult {
        match (&self.0.access, target) {
            (Access::Static(getter), _) => getter(),
            (Access::Field, Some(Value::Object(obj))) => obj
                .get(self.0.name.as_str())
                .ok_or_else(|| missing_field(obj.class(), &self.0.name)),
            (Access::Field, None | Some(Value::Null)) => Err(null_reference(&self.0.name)),
            (Access::Field, Some(other)) => Err(invalid_cast(other, &self.0.declaring)),
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("declaring", &self.0.declaring)
            .field("name", &self.0.name)
            .field("ty", &self.0.ty)
            .field("static", &self.is_static())
            .finish()
    }
}

/// A method that a `Call` node invokes.
#[derive(Clone)]
pub struct Method(Arc<MethodData>);

struct MethodData {
    declaring: Ty,
    name: Name,
    params: Vec<Ty>,
    ret: Ty,
    body: Body,
}

enum Body {
    Instance(Box<InstanceBody>),
    Static(Box<StaticBody>),
}

impl Method {
    /// Instance method on class `declaring`. The body receives the receiver
    /// (never null) and the evaluated arguments.
    pub fn instance(
        declaring: impl Into<Name>,
        name: impl Into<Name>,
        params: Vec<Ty>,
        ret: Ty,
        body: impl Fn(&Value, &[Value]) -> RuntimeResult + Send + Sync + 'static,
    ) -> Self {
        Method(Arc::new(MethodData {
            declaring: Ty::Named(declaring.into()),
            name: name.into(),
            params,
            ret,
            body: Body::Instance(Box::new(body)),
        }))
    }

    /// Static method on `declaring`; the body receives only the arguments.
    pub fn static_fn(
        declaring: impl Into<Name>,
        name: impl Into<Name>,
        params: Vec<Ty>,
        ret: Ty,
        body: impl Fn(&[Value]) -> RuntimeResult + Send + Sync + 'static,
    ) -> Self {
        Method(Arc::new(MethodData {
            declaring: Ty::Named(declaring.into()),
            name: name.into(),
            params,
            ret,
            body: Body::Static(Box::new(body)),
        }))
    }

    #[inline]
    pub fn declaring_type(&self) -> &Ty {
        &self.0.declaring
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.0.name
    }

    #[inline]
    pub fn params(&self) -> &[Ty] {
        &self.0.params
    }

    #[inline]
    pub fn return_type(&self) -> &Ty {
        &self.0.ret
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self.0.body, Body::Static(_))
    }

    /// Run the native body.
    ///
    /// Errors raised by the body are returned unchanged.
    pub fn invoke(&self, receiver: Option<&Value>, args: &[Value]) -> RuntimeResult {
        if args.len() != self.0.params.len() {
            return Err(arity_mismatch(self.0.params.len(), args.len()));
        }
        match (&self.0.body, receiver) {
            (Body::Static(body), _) => body(args),
            (Body::Instance(_), None | Some(Value::Null)) => Err(null_reference(&self.0.name)),
            (Body::Instance(body), Some(receiver)) => body(receiver, args),
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("declaring", &self.0.declaring)
            .field("name", &self.0.name)
            .field("params", &self.0.params)
            .field("ret", &self.0.ret)
            .field("static", &self.is_static())
            .finish()
    }
}
