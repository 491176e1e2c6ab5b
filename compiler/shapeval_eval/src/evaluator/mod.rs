//! The evaluator facade.
//!
//! # Evaluation Paths
//!
//! [`Evaluator::eval`] picks one path per call, from the root node and the
//! number of capture anchors `n`:
//!
//! | Tree                 | Path                                   |
//! |----------------------|----------------------------------------|
//! | root is a `Constant` | return the value, nothing is compiled  |
//! | `n == 0`             | cache the tree itself under arity 0    |
//! | `1 <= n <= max`      | parameterize, cache under arity `n`    |
//! | `n > max`            | compile and run once, uncached         |
//!
//! Captured values are re-read on every call: a cached shape invoked after a
//! captured variable changed sees the new value.

mod builder;

pub use builder::EvaluatorBuilder;

use shapeval_ir::{Expr, Value};
use tracing::{debug, trace};

use crate::{
    collect_captures, compile, parameterize, CacheStats, EvalResult, Parameterized, ShapeCache,
    Signature,
};

/// Evaluates expression trees, reusing compiled code across trees of the
/// same shape.
///
/// `Evaluator` is `Send + Sync`; share it by reference or `Arc` and call
/// [`Evaluator::eval`] from any number of threads. Each instance owns its
/// cache, and instances never share entries.
#[derive(Debug)]
pub struct Evaluator {
    cache: ShapeCache,
}

impl Evaluator {
    /// Captures beyond this count are evaluated uncached unless configured
    /// otherwise.
    pub const DEFAULT_MAX_CACHED_CAPTURES: usize = 3;

    /// Evaluator with empty caches and default configuration.
    pub fn new() -> Self {
        EvaluatorBuilder::new().build()
    }

    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    /// Largest capture count that is served from the cache.
    #[inline]
    pub fn max_cached_captures(&self) -> usize {
        self.cache.max_arity()
    }

    /// Evaluate `expr` and return its value.
    ///
    /// The tree is only read. Errors from host member and method bodies are
    /// returned unchanged inside [`crate::EvalError::Invocation`].
    pub fn eval(&self, expr: &Expr) -> EvalResult {
        if let Some(value) = expr.as_constant() {
            trace!("literal root");
            return Ok(value.clone());
        }

        let captures = collect_captures(expr);
        let arity = captures.len();
        if arity == 0 {
            trace!("capture-free tree");
            return self.eval_closed(expr);
        }
        if arity <= self.cache.max_arity() {
            trace!(captures = arity, "parameterized tree");
            return self.eval_parameterized(expr, &captures);
        }

        debug!(
            captures = arity,
            max = self.cache.max_arity(),
            "too many captures to cache; compiling"
        );
        self.eval_uncached(expr)
    }

    /// Compile and run `expr` once, without consulting or filling the cache.
    ///
    /// Literal roots are compiled like any other tree here.
    pub fn eval_uncached(&self, expr: &Expr) -> EvalResult {
        self.cache.record_uncached();
        let compiled = compile(expr, &[])?;
        Ok(compiled.invoke(&[])?)
    }

    /// Snapshot of cache counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of shapes cached for the given capture count.
    pub fn cached_shapes(&self, arity: usize) -> usize {
        self.cache.len(arity)
    }

    /// A tree with no captures is its own shape.
    fn eval_closed(&self, expr: &Expr) -> EvalResult {
        let compiled = self
            .cache
            .get_or_compile(0, Signature::of(expr), || compile(expr, &[]))?;
        Ok(compiled.invoke(&[])?)
    }

    fn eval_parameterized(&self, expr: &Expr, captures: &[Value]) -> EvalResult {
        let Parameterized { body, placeholders } = parameterize(expr);
        debug_assert_eq!(placeholders.len(), captures.len());

        let compiled = self
            .cache
            .get_or_compile(captures.len(), Signature::of(&body), || {
                compile(&body, &placeholders)
            })?;
        Ok(compiled.invoke(captures)?)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
