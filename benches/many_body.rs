//! Exact versus Barnes-Hut many-body timing.

use std::hint::black_box;
use std::time::Duration;

use collab_graph::GraphData;
use collab_graph::simulation::{Force, GraphModel, ManyBodyForce};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn make_graph(num_nodes: usize) -> GraphModel {
	let nodes: Vec<String> = (0..num_nodes)
		.map(|i| format!(r#"{{"id": "n{i}", "sharedPubs": {}}}"#, i % 7))
		.collect();
	// chain links for determinism
	let links: Vec<String> = (1..num_nodes)
		.map(|i| format!(r#"{{"source": "n{}", "target": "n{i}"}}"#, i - 1))
		.collect();
	let json = format!(
		r#"{{"nodes": [{}], "links": [{}]}}"#,
		nodes.join(","),
		links.join(",")
	);
	let data = GraphData::from_json(&json).unwrap();
	GraphModel::initialize(&data).unwrap()
}

fn bench_many_body(c: &mut Criterion) {
	let mut group = c.benchmark_group("many_body");
	group.sample_size(10);
	group.measurement_time(Duration::from_millis(600));
	group.warm_up_time(Duration::from_millis(200));

	for n in [100, 500, 2000] {
		group.bench_function(format!("direct_n{n}"), |b| {
			b.iter_batched(
				|| (make_graph(n), SmallRng::seed_from_u64(1)),
				|(mut graph, mut rng)| {
					let mut force = ManyBodyForce::new(-200.0).direct_limit(usize::MAX);
					force.apply(&mut graph, 1.0, &mut rng);
					black_box(graph);
				},
				BatchSize::SmallInput,
			)
		});
		group.bench_function(format!("barnes_hut_n{n}"), |b| {
			b.iter_batched(
				|| (make_graph(n), SmallRng::seed_from_u64(1)),
				|(mut graph, mut rng)| {
					let mut force = ManyBodyForce::new(-200.0).direct_limit(0);
					force.apply(&mut graph, 1.0, &mut rng);
					black_box(graph);
				},
				BatchSize::SmallInput,
			)
		});
	}
	group.finish();
}

criterion_group!(benches, bench_many_body);
criterion_main!(benches);
