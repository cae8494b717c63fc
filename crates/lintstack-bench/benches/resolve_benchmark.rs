//! Resolution Performance Benchmarks
//!
//! Run with: `cargo bench --package lintstack-bench resolve_benchmark`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lintstack_core::{CachingLoader, ConfigResolver, Document, MemoryCatalog};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;

const RULES_PER_DOCUMENT: usize = 40;

fn document(index: usize) -> Document {
    let mut doc = Document::new(format!("configs/c{index}"))
        .with_env("node", index % 2 == 0)
        .with_setting(
            "import/resolver",
            json!({ "node": { "extensions": [".js", ".mjs"], "depth": index } }),
        );
    for rule in 0..RULES_PER_DOCUMENT {
        // Overlapping names so later documents override earlier ones
        let name = format!("rule-{}", (index * 7 + rule) % (RULES_PER_DOCUMENT * 2));
        doc = doc.with_rule(name, json!(["error", { "max": index + rule }]));
    }
    doc
}

/// Chain: c{n-1} extends c{n-2} extends ... extends c0
fn deep_catalog(depth: usize) -> MemoryCatalog {
    (0..depth)
        .map(|i| {
            let doc = document(i);
            if i == 0 { doc } else { doc.with_extends(format!("./c{}", i - 1)) }
        })
        .collect()
}

/// Every document extends all the documents below it
fn dense_catalog(size: usize) -> MemoryCatalog {
    (0..size)
        .map(|i| (0..i).fold(document(i), |doc, j| doc.with_extends(format!("./c{j}"))))
        .collect()
}

fn bench_deep_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_chain");

    for &depth in &[5, 25, 100] {
        let catalog = deep_catalog(depth);
        let root = Arc::new(Document::new("app").with_extends(format!("./configs/c{}", depth - 1)));
        let resolver = ConfigResolver::new(&catalog, &catalog);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &root, |b, root| {
            b.iter(|| black_box(resolver.resolve(black_box(root)).unwrap()));
        });
    }

    group.finish();
}

fn bench_dense_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_graph");

    for &size in &[5, 20, 50] {
        let catalog = dense_catalog(size);
        let root = Arc::new(Document::new("app").with_extends(format!("./configs/c{}", size - 1)));
        let resolver = ConfigResolver::new(&catalog, &catalog);

        group.bench_with_input(BenchmarkId::from_parameter(size), &root, |b, root| {
            b.iter(|| black_box(resolver.resolve(black_box(root)).unwrap()));
        });
    }

    group.finish();
}

fn bench_cached_loader(c: &mut Criterion) {
    let cache = CachingLoader::new(dense_catalog(20));
    let resolver = ConfigResolver::new(&cache, &cache);
    let root = Arc::new(Document::new("app").with_extends("./configs/c19"));

    c.bench_function("cached_dense_graph_20", |b| {
        b.iter(|| black_box(resolver.resolve(black_box(&root)).unwrap()));
    });
}

criterion_group!(benches, bench_deep_chain, bench_dense_graph, bench_cached_loader);
criterion_main!(benches);
