//! Benchmarks for table construction and resolution.
//!
//! Tests performance for:
//! - Building tables from scrambled, ascending and descending member lists
//! - Binary-search lookup in a large table
//! - Resolution along a deep superclass chain
//! - Module readability checks

extern crate methodtable;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use methodtable::{
    AccessFlags, ClassDefinition, ClassId, ClassLoadCoordinator, LoaderConfig,
    MethodTableBuilder, ModuleReadGraph, RawMember,
};
use std::hint::black_box;

fn methods(class: ClassId, n: usize, stride: usize) -> Vec<RawMember> {
    (0..n)
        .map(|i| (i * stride) % n)
        .map(|i| RawMember::method(class, format!("method{i:06}"), "()V", AccessFlags::PUBLIC))
        .collect()
}

/// Benchmark building tables of growing size from scrambled input.
fn bench_build_scrambled(c: &mut Criterion) {
    let class = ClassId::new(1);
    let mut group = c.benchmark_group("build_scrambled");

    for n in [60, 600, 6_000, 60_000] {
        let raw = methods(class, n, 7_919);
        group.bench_with_input(BenchmarkId::from_parameter(n), &raw, |b, raw| {
            b.iter(|| {
                let table = MethodTableBuilder::new(class, "Bench")
                    .build(black_box(raw))
                    .unwrap();
                black_box(table)
            });
        });
    }
    group.finish();
}

/// Benchmark the linear-scan fast paths for presorted and reversed input.
fn bench_build_ordered(c: &mut Criterion) {
    let class = ClassId::new(1);
    let ascending = methods(class, 60_000, 1);
    let mut descending = ascending.clone();
    descending.reverse();

    c.bench_function("build_ascending_60000", |b| {
        b.iter(|| {
            let table = MethodTableBuilder::new(class, "Asc")
                .build(black_box(&ascending))
                .unwrap();
            black_box(table)
        });
    });

    c.bench_function("build_descending_60000", |b| {
        b.iter(|| {
            let table = MethodTableBuilder::new(class, "Desc")
                .build(black_box(&descending))
                .unwrap();
            black_box(table)
        });
    });
}

/// Benchmark parallel against sequential sorting of the same input.
fn bench_build_parallel(c: &mut Criterion) {
    let class = ClassId::new(1);
    let raw = methods(class, 200_000, 7_919);
    let parallel = LoaderConfig::default().with_parallel_sort_threshold(1);

    c.bench_function("build_parallel_200000", |b| {
        b.iter(|| {
            let table = MethodTableBuilder::new(class, "Par")
                .with_config(parallel)
                .build(black_box(&raw))
                .unwrap();
            black_box(table)
        });
    });
}

/// Benchmark a hit and a miss in a 60 000 method table.
fn bench_find_method(c: &mut Criterion) {
    let class = ClassId::new(1);
    let table = MethodTableBuilder::new(class, "Lookup")
        .build(&methods(class, 60_000, 7_919))
        .unwrap();

    c.bench_function("find_method_hit", |b| {
        b.iter(|| black_box(table.find_method(black_box("method031337"), black_box("()V"))));
    });

    c.bench_function("find_method_miss", |b| {
        b.iter(|| black_box(table.find_method(black_box("method031337"), black_box("(I)V"))));
    });
}

/// Benchmark resolving a root method from the leaf of a 64 class chain.
fn bench_resolve_inherited(c: &mut Criterion) {
    let loader = ClassLoadCoordinator::new();
    let root = ClassId::new(1);
    loader
        .load_class(&ClassDefinition::new(root, "Root").with_members(methods(root, 100, 7)))
        .unwrap();

    let mut leaf = None;
    for id in 2..=64u32 {
        let class = ClassId::new(id);
        leaf = Some(
            loader
                .load_class(
                    &ClassDefinition::new(class, format!("C{id}"))
                        .with_super(ClassId::new(id - 1))
                        .with_members(methods(class, 10, 3)),
                )
                .unwrap(),
        );
    }
    let leaf = leaf.unwrap();

    c.bench_function("resolve_depth_64", |b| {
        b.iter(|| black_box(loader.resolve(&leaf, black_box("method000042"), "()V").unwrap()));
    });
}

/// Benchmark readability checks over a dense graph.
fn bench_can_read(c: &mut Criterion) {
    let graph = ModuleReadGraph::new();
    let modules: Vec<_> = (0..64)
        .map(|i| graph.define_module(&format!("m{i}")).unwrap())
        .collect();
    for (i, &from) in modules.iter().enumerate() {
        for &to in modules.iter().skip(i + 1) {
            graph.add_reads(from, to).unwrap();
        }
    }

    c.bench_function("can_read_dense_64", |b| {
        b.iter(|| black_box(graph.can_read(black_box(modules[10]), black_box(modules[50])).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_build_scrambled,
    bench_build_ordered,
    bench_build_parallel,
    bench_find_method,
    bench_resolve_inherited,
    bench_can_read,
);
criterion_main!(benches);
