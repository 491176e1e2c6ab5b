use super::*;
use crate::compile;
use pretty_assertions::assert_eq;
use shapeval_ir::{Expr, Param, Ty, Value};

fn constant_fn(value: i64) -> Result<CompiledFn, EvalError> {
    compile(&Expr::constant(value), &[])
}

fn sig(text: &str) -> Signature {
    Signature::of(&Expr::constant(text))
}

#[test]
fn miss_then_hit() {
    let cache = ShapeCache::new(3);

    let first = cache.get_or_compile(0, sig("a"), || constant_fn(1)).unwrap();
    let second = cache
        .get_or_compile(0, sig("a"), || panic!("must not recompile a cached shape"))
        .unwrap();

    assert!(first.ptr_eq(&second));
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 1,
            compilations: 1,
            uncached_compilations: 0,
        }
    );
    assert_eq!(cache.len(0), 1);
}

#[test]
fn arities_are_partitioned() {
    let cache = ShapeCache::new(2);
    let p = Param::new("p", Ty::Int);

    cache.get_or_compile(0, sig("s"), || constant_fn(1)).unwrap();
    cache
        .get_or_compile(1, sig("s"), || compile(&Expr::parameter(&p), &[p.clone()]))
        .unwrap();

    assert_eq!(cache.len(0), 1);
    assert_eq!(cache.len(1), 1);
    assert_eq!(cache.len(2), 0);
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn failed_compilations_are_not_stored() {
    let cache = ShapeCache::new(1);
    let stray = Param::new("i", Ty::Int);
    let broken = || compile(&Expr::parameter(&stray), &[]);

    assert!(cache.get_or_compile(0, sig("bad"), broken).is_err());
    assert!(cache.get_or_compile(0, sig("bad"), broken).is_err());

    assert!(cache.is_empty());
    assert_eq!(cache.stats().compilations, 2);
    assert_eq!(cache.stats().hits, 0);
}

#[test]
fn first_stored_function_wins() {
    let cache = ShapeCache::new(0);

    // The inner call stores its function while the outer one is still
    // compiling, the same interleaving as two threads missing together.
    let mut inner = None;
    let outer = cache
        .get_or_compile(0, sig("race"), || {
            inner = Some(cache.get_or_compile(0, sig("race"), || constant_fn(1)).unwrap());
            constant_fn(2)
        })
        .unwrap();
    let inner = inner.unwrap();

    assert!(outer.ptr_eq(&inner));
    assert_eq!(outer.invoke(&[]).unwrap(), Value::Int(1));
    assert_eq!(cache.len(0), 1);
    assert_eq!(cache.stats().compilations, 2);
}

#[test]
fn arity_above_maximum_is_not_stored() {
    let cache = ShapeCache::new(1);
    let params: Vec<Param> = (0..3).map(|i| Param::new(format!("p{i}"), Ty::Int)).collect();

    let compiled = cache
        .get_or_compile(3, sig("wide"), || compile(&Expr::constant(0), &params))
        .unwrap();

    assert_eq!(compiled.arity(), 3);
    assert!(cache.is_empty());
    assert_eq!(cache.stats().uncached_compilations, 1);
    assert_eq!(cache.stats().misses, 0);
}

#[test]
fn max_arity_reflects_construction() {
    assert_eq!(ShapeCache::new(0).max_arity(), 0);
    assert_eq!(ShapeCache::new(3).max_arity(), 3);
}
