//! Performance benchmarks for dagtext core operations
//!
//! Run with: `cargo bench -p dagtext-core`
//!
//! These benchmarks measure critical path performance:
//! - Node split with default wiring on a wide neighbourhood
//! - Split/join cycles on a long chain
//! - Simple-path enumeration on a layered document
//! - Spring layout on a few hundred nodes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dagtext_core::{DocumentGraph, LayoutMethod, NodeId, SplitPolicy};

/// Chain of `len` nodes, each pointing to the next
fn chain(len: usize) -> (DocumentGraph, Vec<NodeId>) {
    let mut graph = DocumentGraph::new();
    let ids: Vec<NodeId> = (0..len)
        .map(|i| graph.add_node(format!("Paragraph {} of the document. ", i), None))
        .collect();
    for pair in ids.windows(2) {
        graph.add_edge(pair[0], pair[1]).unwrap();
    }
    (graph, ids)
}

/// `layers` layers of `width` nodes, every node linked to every node of the next layer
fn layered(layers: usize, width: usize) -> (DocumentGraph, NodeId, NodeId) {
    let mut graph = DocumentGraph::new();
    let start = graph.add_node("start", None);
    let mut previous = vec![start];

    for layer in 0..layers {
        let current: Vec<NodeId> = (0..width)
            .map(|i| graph.add_node(format!("L{}N{} ", layer, i), None))
            .collect();
        for &head in &previous {
            for &tail in &current {
                graph.add_edge(head, tail).unwrap();
            }
        }
        previous = current;
    }

    let end = graph.add_node("end", None);
    for &head in &previous {
        graph.add_edge(head, end).unwrap();
    }
    (graph, start, end)
}

/// Benchmark splitting a hub node with many neighbours
fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_node");

    for fan in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(fan), &fan, |b, &fan| {
            b.iter_batched(
                || {
                    let mut graph = DocumentGraph::new();
                    let hub = graph.add_node("the quick brown fox", None);
                    for i in 0..fan {
                        let up = graph.add_node(i, None);
                        let down = graph.add_node(i, None);
                        graph.add_edge(up, hub).unwrap();
                        graph.add_edge(hub, down).unwrap();
                    }
                    (graph, hub)
                },
                |(mut graph, hub)| {
                    black_box(graph.split_node(hub, 9, SplitPolicy::default()).unwrap());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark split followed by join on a 1000-node chain
fn bench_split_join_cycle(c: &mut Criterion) {
    c.bench_function("split_join_cycle_1000_chain", |b| {
        let (mut graph, ids) = chain(1000);
        let mut target = ids[500];

        b.iter(|| {
            let (head, tail) = graph.split_node_with_defaults(target, 10).unwrap();
            target = graph.join_nodes_with_defaults(head, tail).unwrap();
            // Joined titles concatenate; keep them from growing across iterations
            graph.set_title(target, "Chapter").unwrap();
        });
    });
}

/// Benchmark flow enumeration: 4^4 paths through a layered document
fn bench_simple_paths(c: &mut Criterion) {
    let (graph, start, end) = layered(4, 4);

    c.bench_function("simple_paths_layered_4x4", |b| {
        b.iter(|| {
            let count = graph.query().simple_paths(start, end).unwrap().count();
            black_box(count);
        });
    });

    c.bench_function("flow_strings_layered_4x4", |b| {
        b.iter(|| black_box(graph.query().flow_strings(start, end, "").unwrap()));
    });
}

/// Benchmark layouts on a 200-node chain
fn bench_layout(c: &mut Criterion) {
    let (graph, _) = chain(200);
    let mut group = c.benchmark_group("layout_200_chain");
    group.sample_size(10);

    for method in [LayoutMethod::Spring, LayoutMethod::Spectral, LayoutMethod::Dot] {
        group.bench_function(method.as_str(), |b| {
            b.iter(|| {
                black_box(
                    graph
                        .layout()
                        .compute_positions(1024.0, 768.0, method)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_split,
    bench_split_join_cycle,
    bench_simple_paths,
    bench_layout
);
criterion_main!(benches);
