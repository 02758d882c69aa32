use rand::rngs::SmallRng;

use super::{Force, jiggle};
use crate::simulation::model::GraphModel;

/// Soft separation of overlapping nodes.
///
/// Works on predicted positions (`x + vx`). For every pair closer than the sum
/// of their collision radii, the overlap is turned into a velocity correction
/// scaled by `strength * alpha`, split so the smaller node yields more.
#[derive(Clone, Debug)]
pub struct CollideForce {
	strength: f64,
	iterations: usize,
	radii: Vec<f64>,
}

impl Default for CollideForce {
	fn default() -> Self {
		Self {
			strength: 1.0,
			iterations: 1,
			radii: Vec::new(),
		}
	}
}

impl CollideForce {
	/// Collision at full strength with one pass per tick.
	pub fn new() -> Self {
		Self::default()
	}

	/// Fraction of each overlap resolved per pass, before alpha scaling.
	pub fn strength(mut self, strength: f64) -> Self {
		self.strength = strength;
		self
	}

	/// Relaxation passes per tick.
	pub fn iterations(mut self, iterations: usize) -> Self {
		self.iterations = iterations.max(1);
		self
	}
}

impl Force for CollideForce {
	fn initialize(&mut self, graph: &GraphModel) {
		self.radii = graph.nodes().iter().map(|node| node.collision_radius()).collect();
	}

	fn apply(&mut self, graph: &mut GraphModel, alpha: f64, rng: &mut SmallRng) {
		if self.radii.len() != graph.len() {
			self.initialize(graph);
		}
		let nodes = graph.nodes_mut();
		let n = nodes.len();

		for _ in 0..self.iterations {
			for i in 0..n {
				let ri = self.radii[i];
				let ri2 = ri * ri;
				let xi = nodes[i].x + nodes[i].vx;
				let yi = nodes[i].y + nodes[i].vy;

				for j in (i + 1)..n {
					let rj = self.radii[j];
					let r = ri + rj;
					let mut x = xi - nodes[j].x - nodes[j].vx;
					let mut y = yi - nodes[j].y - nodes[j].vy;
					let mut l = x * x + y * y;
					if l >= r * r {
						continue;
					}

					if x == 0.0 {
						x = jiggle(rng);
						l += x * x;
					}
					if y == 0.0 {
						y = jiggle(rng);
						l += y * y;
					}
					let l = l.sqrt();
					let k = (r - l) / l * self.strength * alpha;
					let (x, y) = (x * k, y * k);
					let rj2 = rj * rj;
					let share = rj2 / (ri2 + rj2);

					nodes[i].vx += x * share;
					nodes[i].vy += y * share;
					nodes[j].vx -= x * (1.0 - share);
					nodes[j].vy -= y * (1.0 - share);
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::*;
	use crate::simulation::fixtures;

	#[test]
	fn separated_nodes_are_untouched() {
		let mut graph = fixtures::graph(
			&[("a", "", 1.0, 0.0, 0.0), ("b", "", 1.0, 11.0, 0.0)],
			&[],
		);
		let mut rng = SmallRng::seed_from_u64(5);
		let mut force = CollideForce::new();
		force.initialize(&graph);
		force.apply(&mut graph, 1.0, &mut rng);
		assert!(graph.nodes().iter().all(|n| n.vx == 0.0 && n.vy == 0.0));
	}

	#[test]
	fn overlap_pushes_apart_weighted_by_size() {
		// radii 23 and 5, centres 10 apart
		let mut graph = fixtures::graph(
			&[("big", "", 10.0, 0.0, 0.0), ("small", "", 1.0, 10.0, 0.0)],
			&[],
		);
		let mut rng = SmallRng::seed_from_u64(5);
		let mut force = CollideForce::new();
		force.initialize(&graph);
		force.apply(&mut graph, 1.0, &mut rng);

		let (big, small) = (&graph.nodes()[0], &graph.nodes()[1]);
		assert!(big.vx < 0.0);
		assert!(small.vx > 0.0);
		assert!(small.vx > big.vx.abs());
		// total correction equals the overlap
		assert!((small.vx - big.vx - 18.0).abs() < 1e-9);
	}
}
