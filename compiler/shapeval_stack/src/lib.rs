//! Stack growth for deeply nested expression trees.
//!
//! Every walk over an `Expr` in shapeval is recursive: capture
//! classification, parameterization, shape printing and closure
//! compilation. Host-built trees can be arbitrarily deep (a long chain of
//! `a + b + c + ...` is left-nested), so each recursive step goes through
//! [`ensure_sufficient_stack`].
//!
//! On native targets the `stacker` crate allocates a fresh segment when the
//! remaining stack drops below the red zone. On wasm the closure runs as-is.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// ```text
/// fn depth(expr: &Expr) -> usize {
///     ensure_sufficient_stack(|| match expr {
///         Expr::Unary { operand, .. } => depth(operand) + 1,
///         _ => 1,
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// wasm manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
