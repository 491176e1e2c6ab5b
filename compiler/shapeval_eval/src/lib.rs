//! Shapeval Eval - evaluate expression trees without recompiling per call.
//!
//! A host builds a small expression tree out of literals, captured objects,
//! member reads and method calls, and wants its value. Compiling every tree
//! from scratch is wasteful when the same *shape* recurs with different
//! captured values, so the evaluator:
//!
//! 1. collects the captured values the tree is rooted in ([`collect_captures`]),
//! 2. replaces each capture anchor with a typed placeholder ([`parameterize`]),
//! 3. looks the placeholder tree's [`Signature`] up in an arity-partitioned
//!    [`ShapeCache`], compiling it once on a miss ([`compile`]),
//! 4. invokes the cached [`CompiledFn`] with this call's captured values.
//!
//! # Architecture
//!
//! - `capture`: read-only walk that finds capture anchors
//! - `parameterize`: rewriting walk that introduces placeholders
//! - `signature`: canonical cache key of a shape
//! - `compile`: lowers a tree into a composition of `Send + Sync` closures
//! - `cache`: one `DashMap` per arity, append-only
//! - `evaluator`: the facade and its builder
//!
//! Trees with more captures than the cache handles (three by default) are
//! compiled and run once, uncached. That path is slow by construction.

mod cache;
mod capture;
mod compile;
mod errors;
mod evaluator;
mod logging;
mod parameterize;
mod signature;

#[cfg(test)]
mod test_helpers;

pub use cache::{CacheStats, ShapeCache};
pub use capture::{collect_captures, Captures};
pub use compile::{compile, CompiledFn};
pub use errors::{CompileError, EvalError, EvalResult};
pub use evaluator::{Evaluator, EvaluatorBuilder};
pub use logging::init_tracing;
pub use parameterize::{parameterize, Parameterized};
pub use signature::Signature;
