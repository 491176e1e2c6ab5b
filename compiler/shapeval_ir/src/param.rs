//! Parameter handles.

use std::fmt;
use std::sync::Arc;

use crate::{Name, Ty};

/// A formal parameter.
///
/// Parameters are bound by handle identity: two `Param`s created separately
/// are different parameters even when name and type agree. The compiler
/// resolves a `Parameter` node only against the exact handles it was given,
/// so a tree that still mentions some enclosing lambda's parameter cannot be
/// bound by accident.
#[derive(Clone)]
pub struct Param(Arc<ParamData>);

struct ParamData {
    name: Name,
    ty: Ty,
}

impl Param {
    pub fn new(name: impl Into<Name>, ty: Ty) -> Self {
        Param(Arc::new(ParamData {
            name: name.into(),
            ty,
        }))
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.0.name
    }

    #[inline]
    pub fn ty(&self) -> &Ty {
        &self.0.ty
    }
}

impl PartialEq for Param {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Param {}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Param({}: {})", self.0.name, self.0.ty)
    }
}
