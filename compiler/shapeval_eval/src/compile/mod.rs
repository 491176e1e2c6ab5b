//! Lowering expression trees to executable closures.
//!
//! [`compile`] type-checks a tree against its formal parameters and lowers
//! every node into a boxed closure over the argument frame. The closures
//! compose bottom-up, so invoking the root runs the whole tree with no
//! further dispatch on node kinds.
//!
//! # Static Typing
//!
//! Each node is typed while it is lowered:
//! - member and method targets must be assignable to the declaring type
//! - call arguments must be assignable to the declared parameter types
//! - operators follow the rules in `operators`
//! - conditional tests must be `bool`
//!
//! `Any` on either side of a check defers it to run time. Member reads and
//! method results are checked against their declared type when they run, so
//! a host body returning the wrong kind of value fails with `InvalidCast`
//! instead of reaching an operator that assumed otherwise.
//!
//! Composite nodes run under `ensure_sufficient_stack`, the same as the
//! walks over the tree.

mod operators;

use std::fmt;
use std::sync::Arc;

use shapeval_ir::{
    arity_mismatch, invalid_cast, BinaryOp, Expr, Member, Method, Param, RuntimeResult, Ty,
    UnaryOp, Value,
};
use shapeval_stack::ensure_sufficient_stack;
use smallvec::SmallVec;
use tracing::trace;

use crate::errors::{
    argument_mismatch, branch_mismatch, call_arity_mismatch, invalid_binary_op,
    invalid_conversion, invalid_unary_op, member_target_mismatch, method_target_mismatch,
    missing_target, non_bool_test, unbound_variable, unexpected_target, EvalError,
};
use operators::{binary_result_ty, evaluate_binary, evaluate_unary, unary_result_ty};

/// A lowered node: reads the argument frame, produces a value.
type Node = Box<dyn Fn(&[Value]) -> RuntimeResult + Send + Sync>;

#[inline]
fn node(f: impl Fn(&[Value]) -> RuntimeResult + Send + Sync + 'static) -> Node {
    Box::new(f)
}

struct Lowered {
    node: Node,
    ty: Ty,
}

/// An executable function of `arity` untyped arguments.
///
/// Cheap to clone; clones share the lowered closures. Safe to invoke from
/// any number of threads at once.
#[derive(Clone)]
pub struct CompiledFn(Arc<CompiledFnInner>);

struct CompiledFnInner {
    params: Vec<Ty>,
    result: Ty,
    body: Node,
}

impl CompiledFn {
    #[inline]
    pub fn arity(&self) -> usize {
        self.0.params.len()
    }

    /// Declared types of the formal parameters.
    pub fn param_types(&self) -> &[Ty] {
        &self.0.params
    }

    /// Static type of the result, before it is handed back untyped.
    pub fn result_type(&self) -> &Ty {
        &self.0.result
    }

    /// Whether both handles share one compiled body.
    #[inline]
    pub fn ptr_eq(&self, other: &CompiledFn) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Run the function.
    ///
    /// Each argument is cast to its parameter's declared type first; a value
    /// of the wrong class fails with `InvalidCast` before any node runs.
    pub fn invoke(&self, args: &[Value]) -> RuntimeResult {
        let params = &self.0.params;
        if args.len() != params.len() {
            return Err(arity_mismatch(params.len(), args.len()));
        }
        let frame = args
            .iter()
            .zip(params)
            .map(|(arg, ty)| ty.convert(arg.clone()))
            .collect::<Result<SmallVec<[Value; 4]>, _>>()?;
        (self.0.body)(&frame)
    }
}

impl fmt::Debug for CompiledFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFn")
            .field("params", &self.0.params)
            .field("result", &self.0.result)
            .finish_non_exhaustive()
    }
}

/// Type-check `body` and lower it into a function of `params`.
///
/// `Parameter` nodes bind by handle identity against `params`; any other
/// parameter is reported as [`EvalError::UnboundVariable`]. The tree is only
/// read, and the result holds its own handles to every descriptor and
/// literal it needs.
pub fn compile(body: &Expr, params: &[Param]) -> Result<CompiledFn, EvalError> {
    let lowered = Lowerer { params }.lower(body)?;
    trace!(arity = params.len(), result = %lowered.ty, "lowered expression");
    Ok(CompiledFn(Arc::new(CompiledFnInner {
        params: params.iter().map(|param| param.ty().clone()).collect(),
        result: lowered.ty,
        body: lowered.node,
    })))
}

/// Check a value produced by host code against its declared type.
#[inline]
fn checked_result(ty: &Ty, value: Value) -> RuntimeResult {
    if ty.accepts(&value) {
        Ok(value)
    } else {
        Err(invalid_cast(&value, ty))
    }
}

#[inline]
fn expect_bool(value: Value) -> RuntimeResult {
    match value {
        Value::Bool(_) => Ok(value),
        other => Err(invalid_cast(&other, &Ty::Bool)),
    }
}

struct Lowerer<'a> {
    params: &'a [Param],
}

impl Lowerer<'_> {
    fn lower(&self, expr: &Expr) -> Result<Lowered, EvalError> {
        ensure_sufficient_stack(|| match expr {
            Expr::Constant(value) => Ok(Self::lower_constant(value)),
            Expr::Parameter(param) => self.lower_parameter(param),
            Expr::Convert { operand, ty } => self.lower_convert(operand, ty),
            Expr::Member { target, member } => self.lower_member(target.as_deref(), member),
            Expr::Call {
                target,
                method,
                args,
            } => self.lower_call(target.as_deref(), method, args),
            Expr::Unary { op, operand } => self.lower_unary(*op, operand),
            Expr::Binary { op, left, right } => self.lower_binary(*op, left, right),
            Expr::Conditional {
                test,
                then,
                otherwise,
            } => self.lower_conditional(test, then, otherwise),
        })
    }

    fn lower_constant(value: &Value) -> Lowered {
        let value = value.clone();
        Lowered {
            ty: Ty::of(&value),
            node: node(move |_| Ok(value.clone())),
        }
    }

    fn lower_parameter(&self, param: &Param) -> Result<Lowered, EvalError> {
        let index = self
            .params
            .iter()
            .position(|candidate| candidate == param)
            .ok_or_else(|| unbound_variable(param))?;
        let arity = self.params.len();
        Ok(Lowered {
            ty: param.ty().clone(),
            node: node(move |frame| {
                frame
                    .get(index)
                    .cloned()
                    .ok_or_else(|| arity_mismatch(arity, frame.len()))
            }),
        })
    }

    fn lower_convert(&self, operand: &Expr, ty: &Ty) -> Result<Lowered, EvalError> {
        let operand = self.lower(operand)?;
        if !ty.can_convert_from(&operand.ty) {
            return Err(invalid_conversion(&operand.ty, ty));
        }
        let target = ty.clone();
        let inner = operand.node;
        Ok(Lowered {
            ty: ty.clone(),
            node: node(move |frame| ensure_sufficient_stack(|| target.convert(inner(frame)?))),
        })
    }

    fn lower_member(&self, target: Option<&Expr>, member: &Member) -> Result<Lowered, EvalError> {
        let member = member.clone();
        let ty = member.ty().clone();
        let declared = ty.clone();
        let lowered = match (target, member.is_static()) {
            (Some(_), true) => return Err(unexpected_target(member.name())),
            (None, false) => return Err(missing_target(member.name())),
            (None, true) => node(move |_| checked_result(&declared, member.read(None)?)),
            (Some(target), false) => {
                let target = self.lower(target)?;
                if !member.declaring_type().is_assignable_from(&target.ty) {
                    return Err(member_target_mismatch(&member, &target.ty));
                }
                let receiver = target.node;
                node(move |frame| {
                    let receiver = ensure_sufficient_stack(|| receiver(frame))?;
                    checked_result(&declared, member.read(Some(&receiver))?)
                })
            }
        };
        Ok(Lowered { node: lowered, ty })
    }

    fn lower_call(
        &self,
        target: Option<&Expr>,
        method: &Method,
        args: &[Expr],
    ) -> Result<Lowered, EvalError> {
        let method = method.clone();
        let receiver = match (target, method.is_static()) {
            (Some(_), true) => return Err(unexpected_target(method.name())),
            (None, false) => return Err(missing_target(method.name())),
            (None, true) => None,
            (Some(target), false) => {
                let target = self.lower(target)?;
                if !method.declaring_type().is_assignable_from(&target.ty) {
                    return Err(method_target_mismatch(&method, &target.ty));
                }
                Some(target.node)
            }
        };

        if args.len() != method.params().len() {
            return Err(call_arity_mismatch(&method, args.len()));
        }
        let mut arg_nodes = Vec::with_capacity(args.len());
        for (index, (arg, expected)) in args.iter().zip(method.params()).enumerate() {
            let arg = self.lower(arg)?;
            if !expected.is_assignable_from(&arg.ty) {
                return Err(argument_mismatch(&method, index, expected, &arg.ty));
            }
            arg_nodes.push(arg.node);
        }

        let ty = method.return_type().clone();
        let declared = ty.clone();
        Ok(Lowered {
            ty,
            node: node(move |frame| {
                ensure_sufficient_stack(|| {
                    let receiver = receiver.as_ref().map(|receiver| receiver(frame)).transpose()?;
                    let args = arg_nodes
                        .iter()
                        .map(|arg| arg(frame))
                        .collect::<Result<SmallVec<[Value; 4]>, _>>()?;
                    checked_result(&declared, method.invoke(receiver.as_ref(), &args)?)
                })
            }),
        })
    }

    fn lower_unary(&self, op: UnaryOp, operand: &Expr) -> Result<Lowered, EvalError> {
        let operand = self.lower(operand)?;
        let ty = unary_result_ty(op, &operand.ty)
            .ok_or_else(|| invalid_unary_op(op, &operand.ty))?;
        let inner = operand.node;
        Ok(Lowered {
            ty,
            node: node(move |frame| ensure_sufficient_stack(|| evaluate_unary(op, inner(frame)?))),
        })
    }

    fn lower_binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Lowered, EvalError> {
        let left = self.lower(left)?;
        let right = self.lower(right)?;
        let ty = binary_result_ty(op, &left.ty, &right.ty)
            .ok_or_else(|| invalid_binary_op(op, &left.ty, &right.ty))?;
        let (lhs, rhs) = (left.node, right.node);
        let lowered = match op {
            BinaryOp::And | BinaryOp::Or => {
                // `&&` stops at false, `||` at true; the right side never runs then.
                let stop_at = op == BinaryOp::Or;
                node(move |frame| {
                    ensure_sufficient_stack(|| match lhs(frame)? {
                        Value::Bool(b) if b == stop_at => Ok(Value::Bool(b)),
                        Value::Bool(_) => expect_bool(rhs(frame)?),
                        other => Err(invalid_cast(&other, &Ty::Bool)),
                    })
                })
            }
            _ => node(move |frame| {
                ensure_sufficient_stack(|| {
                    let left = lhs(frame)?;
                    let right = rhs(frame)?;
                    evaluate_binary(op, left, right)
                })
            }),
        };
        Ok(Lowered { node: lowered, ty })
    }

    fn lower_conditional(
        &self,
        test: &Expr,
        then: &Expr,
        otherwise: &Expr,
    ) -> Result<Lowered, EvalError> {
        let test = self.lower(test)?;
        if !matches!(test.ty, Ty::Bool | Ty::Any) {
            return Err(non_bool_test(&test.ty));
        }
        let then = self.lower(then)?;
        let otherwise = self.lower(otherwise)?;
        let ty = if then.ty == otherwise.ty {
            then.ty.clone()
        } else if then.ty.is_any() || otherwise.ty.is_any() {
            Ty::Any
        } else {
            return Err(branch_mismatch(&then.ty, &otherwise.ty));
        };

        let (test, then, otherwise) = (test.node, then.node, otherwise.node);
        Ok(Lowered {
            ty,
            node: node(move |frame| {
                ensure_sufficient_stack(|| match test(frame)? {
                    Value::Bool(true) => then(frame),
                    Value::Bool(false) => otherwise(frame),
                    other => Err(invalid_cast(&other, &Ty::Bool)),
                })
            }),
        })
    }
}
