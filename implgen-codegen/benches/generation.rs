//! Generation benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use implgen_codegen::{BodySynthesizer, Implementor, ObligationCollector};
use implgen_core::QualifiedName;
use implgen_schema::Resolver;
use std::hint::black_box;

fn benchmark_standard_library_load(c: &mut Criterion) {
    c.bench_function("stdlib_load", |b| {
        b.iter(|| Resolver::standard_library().unwrap())
    });
}

fn benchmark_obligation_collection(c: &mut Criterion) {
    let resolver = Resolver::standard_library().unwrap();
    let list = resolver
        .resolve(&QualifiedName::new("java.util.AbstractList"))
        .unwrap();

    c.bench_function("collect_abstract_list", |b| {
        b.iter(|| {
            ObligationCollector::new(&resolver)
                .collect(black_box(&list))
                .unwrap()
        })
    });
}

fn benchmark_render(c: &mut Criterion) {
    let resolver = Resolver::standard_library().unwrap();
    let implementor = Implementor::new("bench-out");

    for name in ["java.lang.Runnable", "java.util.List", "java.io.Writer"] {
        c.bench_function(&format!("render_{name}"), |b| {
            b.iter(|| implementor.render(&resolver, black_box(name)).unwrap())
        });
    }
}

fn benchmark_synthesis(c: &mut Criterion) {
    let resolver = Resolver::standard_library().unwrap();
    let writer = resolver
        .resolve(&QualifiedName::new("java.io.Writer"))
        .unwrap();
    let obligations = ObligationCollector::new(&resolver).collect(&writer).unwrap();

    c.bench_function("synthesize_writer", |b| {
        b.iter(|| BodySynthesizer::new().synthesize_all(black_box(&obligations)))
    });
}

criterion_group!(
    benches,
    benchmark_standard_library_load,
    benchmark_obligation_collection,
    benchmark_render,
    benchmark_synthesis
);
criterion_main!(benches);
