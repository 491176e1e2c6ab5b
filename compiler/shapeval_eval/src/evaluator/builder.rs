//! `EvaluatorBuilder` for configuring `Evaluator` instances.

use super::Evaluator;
use crate::ShapeCache;

/// Builder for [`Evaluator`].
///
/// ```text
/// let evaluator = Evaluator::builder().max_cached_captures(5).build();
/// ```
#[derive(Clone, Debug)]
pub struct EvaluatorBuilder {
    max_cached_captures: usize,
}

impl EvaluatorBuilder {
    pub fn new() -> Self {
        EvaluatorBuilder {
            max_cached_captures: Evaluator::DEFAULT_MAX_CACHED_CAPTURES,
        }
    }

    /// Largest number of captured values a cached shape may take.
    ///
    /// Trees with more captures are compiled on every evaluation. Each
    /// additional arity costs one (initially empty) map.
    #[must_use]
    pub fn max_cached_captures(mut self, max: usize) -> Self {
        self.max_cached_captures = max;
        self
    }

    pub fn build(self) -> Evaluator {
        Evaluator {
            cache: ShapeCache::new(self.max_cached_captures),
        }
    }
}

impl Default for EvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
