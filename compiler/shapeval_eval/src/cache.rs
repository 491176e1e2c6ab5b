//! Arity-partitioned cache of compiled shapes.
//!
//! One concurrent map per arity `0..=max_arity`, keyed by [`Signature`].
//! Entries are only ever added: nothing is evicted or replaced, so a
//! function handed out for a signature stays the function for that
//! signature for the cache's lifetime.
//!
//! # Concurrency
//!
//! The hit path is a single sharded read (`DashMap::get`). On a miss the
//! shape is compiled *outside* any shard lock, then offered with
//! `entry().or_insert()`. Two threads missing on the same signature may
//! both compile; the first insert wins and both return the stored function.
//! Compilation failures are returned to the caller and never stored.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::{CompiledFn, EvalError, Signature};

type ShapeMap = DashMap<Signature, CompiledFn, FxBuildHasher>;

/// Counters describing cache behaviour since construction.
///
/// Monotonic. Read individually with relaxed ordering, so a snapshot taken
/// while other threads evaluate is approximate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found a stored function.
    pub hits: u64,
    /// Lookups that did not.
    pub misses: u64,
    /// Compilations performed for cacheable shapes, including ones that
    /// failed or lost an insert race.
    pub compilations: u64,
    /// Compilations performed outside the cache (too many captures, or an
    /// explicit uncached evaluation).
    pub uncached_compilations: u64,
}

/// Compiled functions keyed by arity and shape signature.
pub struct ShapeCache {
    maps: Vec<ShapeMap>,
    hits: AtomicU64,
    misses: AtomicU64,
    compilations: AtomicU64,
    uncached_compilations: AtomicU64,
}

impl ShapeCache {
    /// Empty cache holding shapes of arity `0..=max_arity`.
    pub fn new(max_arity: usize) -> Self {
        ShapeCache {
            maps: (0..=max_arity)
                .map(|_| DashMap::with_hasher(FxBuildHasher))
                .collect(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            compilations: AtomicU64::new(0),
            uncached_compilations: AtomicU64::new(0),
        }
    }

    /// Largest arity this cache stores.
    #[inline]
    pub fn max_arity(&self) -> usize {
        self.maps.len().saturating_sub(1)
    }

    /// Return the function stored for `(arity, signature)`, compiling and
    /// storing it on a miss.
    ///
    /// `compile` must produce a function of exactly `arity` parameters whose
    /// behaviour is determined by `signature`. An arity above
    /// [`ShapeCache::max_arity`] is compiled and returned without storing.
    pub fn get_or_compile<F>(
        &self,
        arity: usize,
        signature: Signature,
        compile: F,
    ) -> Result<CompiledFn, EvalError>
    where
        F: FnOnce() -> Result<CompiledFn, EvalError>,
    {
        let Some(map) = self.maps.get(arity) else {
            self.record_uncached();
            return compile();
        };

        if let Some(compiled) = map.get(&signature) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(compiled.value().clone());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        self.compilations.fetch_add(1, Ordering::Relaxed);
        let compiled = compile()?;
        debug_assert_eq!(compiled.arity(), arity);
        debug!(arity, %signature, "compiled shape");

        Ok(map.entry(signature).or_insert(compiled).value().clone())
    }

    /// Count a compilation done outside the cache.
    #[inline]
    pub fn record_uncached(&self) {
        self.uncached_compilations.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of shapes stored for `arity`.
    pub fn len(&self, arity: usize) -> usize {
        self.maps.get(arity).map_or(0, DashMap::len)
    }

    /// Whether no shape of any arity has been stored.
    pub fn is_empty(&self) -> bool {
        self.maps.iter().all(DashMap::is_empty)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            compilations: self.compilations.load(Ordering::Relaxed),
            uncached_compilations: self.uncached_compilations.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for ShapeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sizes: Vec<usize> = self.maps.iter().map(DashMap::len).collect();
        f.debug_struct("ShapeCache")
            .field("shapes_per_arity", &sizes)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap to panic on unexpected state")]
mod tests;
