//! Cached evaluation against compile-every-time evaluation.
//!
//! Each iteration rebuilds the tree the way a host does for every call,
//! with a fresh closure object, so the cached path pays for capture
//! collection, parameterization and a signature lookup, and the uncached
//! path pays for a full compilation.

#![allow(clippy::unwrap_used, reason = "benchmarks panic on unexpected state")]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use shapeval_eval::{init_tracing, Evaluator};
use shapeval_ir::{Expr, Ty};

#[path = "../tests/fixtures/mod.rs"]
mod fixtures;

use fixtures::{captured, closure, inner, outer, Model};

fn property(m: &Model, val1: i64) -> Expr {
    let env = closure("PropertyEnv", &[("instance", outer().with_field("Val1", val1).into())]);
    Expr::member(captured(&env, "instance", Ty::named("Outer")), &m.val1)
}

fn property_chain(m: &Model, val2: i64) -> Expr {
    let env = closure(
        "PropertyChainEnv",
        &[("instance", outer().with_field("Inner", inner(val2)).into())],
    );
    Expr::member(
        Expr::member(captured(&env, "instance", Ty::named("Outer")), &m.inner),
        &m.val2,
    )
}

fn bench_shapes(c: &mut Criterion) {
    init_tracing();
    let m = Model::new();
    let mut group = c.benchmark_group("shape_cache");

    let cases: [(&str, fn(&Model, i64) -> Expr); 2] =
        [("property", property), ("property_chain", property_chain)];

    for (name, build) in cases {
        let evaluator = Evaluator::new();
        evaluator.eval(&build(&m, 0)).unwrap();

        group.bench_function(BenchmarkId::new("cached", name), |b| {
            let mut i = 0;
            b.iter(|| {
                i += 1;
                black_box(evaluator.eval(&build(&m, i)).unwrap())
            });
        });

        group.bench_function(BenchmarkId::new("uncached", name), |b| {
            let mut i = 0;
            b.iter(|| {
                i += 1;
                black_box(evaluator.eval_uncached(&build(&m, i)).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_shapes);
criterion_main!(benches);
