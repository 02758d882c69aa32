use rand::rngs::SmallRng;

use super::{Force, jiggle};
use crate::simulation::model::GraphModel;

/// Spring force pulling (or pushing) linked nodes toward a rest length.
///
/// The correction for each link is split between its endpoints by degree, so a
/// hub with many links moves less per link than a leaf attached to it.
#[derive(Clone, Debug)]
pub struct LinkForce {
	strength: f64,
	distance: f64,
	pad_with_radii: bool,
	iterations: usize,
	/// Share of each link's correction taken by its target.
	bias: Vec<f64>,
	/// Rest length of each link.
	lengths: Vec<f64>,
}

impl LinkForce {
	/// Springs of the given stiffness and base rest length.
	pub fn new(strength: f64, distance: f64) -> Self {
		Self {
			strength,
			distance,
			pad_with_radii: false,
			iterations: 1,
			bias: Vec::new(),
			lengths: Vec::new(),
		}
	}

	/// Adds both endpoints' collision radii to every link's rest length.
	pub fn pad_with_radii(mut self, pad: bool) -> Self {
		self.pad_with_radii = pad;
		self
	}

	/// Relaxation passes per tick.
	pub fn iterations(mut self, iterations: usize) -> Self {
		self.iterations = iterations.max(1);
		self
	}

	/// Spring stiffness.
	pub fn strength(&self) -> f64 {
		self.strength
	}

	/// Changes the stiffness; takes effect on the next tick.
	pub fn set_strength(&mut self, strength: f64) {
		self.strength = strength;
	}

	/// Base rest length, before padding.
	pub fn distance(&self) -> f64 {
		self.distance
	}

	/// Rest length of link `index`, as computed at the last initialization.
	pub fn rest_length(&self, index: usize) -> Option<f64> {
		self.lengths.get(index).copied()
	}
}

impl Force for LinkForce {
	fn initialize(&mut self, graph: &GraphModel) {
		let degrees = graph.degrees();
		self.bias.clear();
		self.lengths.clear();

		for link in graph.links() {
			let (source, target) = (degrees[link.source] as f64, degrees[link.target] as f64);
			self.bias.push(source / (source + target));

			let (s, t) = graph.endpoints(link);
			let padding = if self.pad_with_radii {
				s.collision_radius() + t.collision_radius()
			} else {
				0.0
			};
			self.lengths.push(self.distance + padding);
		}
	}

	fn apply(&mut self, graph: &mut GraphModel, alpha: f64, rng: &mut SmallRng) {
		if self.lengths.len() != graph.links().len() {
			self.initialize(graph);
		}

		for _ in 0..self.iterations {
			for i in 0..graph.links().len() {
				let link = graph.links()[i];
				let (s, t) = graph.endpoints(&link);

				let mut x = t.x + t.vx - s.x - s.vx;
				if x == 0.0 {
					x = jiggle(rng);
				}
				let mut y = t.y + t.vy - s.y - s.vy;
				if y == 0.0 {
					y = jiggle(rng);
				}

				let l = x.hypot(y);
				let k = (l - self.lengths[i]) / l * alpha * self.strength;
				let (x, y) = (x * k, y * k);
				let b = self.bias[i];

				let nodes = graph.nodes_mut();
				nodes[link.target].vx -= x * b;
				nodes[link.target].vy -= y * b;
				nodes[link.source].vx += x * (1.0 - b);
				nodes[link.source].vy += y * (1.0 - b);
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
	fn stretched_link_pulls_endpoints_together() {
		let mut graph = fixtures::graph(
			&[("a", "", 0.0, 0.0, 0.0), ("b", "", 0.0, 100.0, 0.0)],
			&[("a", "b")],
		);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut force = LinkForce::new(0.5, 30.0);
		force.initialize(&graph);
		force.apply(&mut graph, 1.0, &mut rng);

		let nodes = graph.nodes();
		assert!(nodes[0].vx > 0.0);
		assert!(nodes[1].vx < 0.0);
		// (100 - 30) * 0.5 split evenly between equal-degree endpoints
		assert!((nodes[0].vx - 17.5).abs() < 1e-9);
		assert!((nodes[1].vx + 17.5).abs() < 1e-9);
	}

	#[test]
	fn compressed_link_pushes_apart() {
		let mut graph = fixtures::graph(
			&[("a", "", 0.0, 0.0, 0.0), ("b", "", 0.0, 10.0, 0.0)],
			&[("a", "b")],
		);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut force = LinkForce::new(1.0, 30.0);
		force.initialize(&graph);
		force.apply(&mut graph, 0.5, &mut rng);

		assert!(graph.nodes()[0].vx < 0.0);
		assert!(graph.nodes()[1].vx > 0.0);
	}

	#[test]
	fn hub_moves_less_than_leaves() {
		let mut graph = fixtures::graph(
			&[
				("hub", "", 0.0, 0.0, 0.0),
				("l1", "", 0.0, 100.0, 0.0),
				("l2", "", 0.0, 0.0, 100.0),
				("l3", "", 0.0, -100.0, 0.0),
			],
			&[("hub", "l1"), ("hub", "l2"), ("hub", "l3")],
		);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut force = LinkForce::new(0.5, 30.0);
		force.initialize(&graph);
		force.apply(&mut graph, 1.0, &mut rng);

		let nodes = graph.nodes();
		// hub degree 3, leaf degree 1: target (leaf) takes 3/4, source (hub) 1/4
		assert!((nodes[1].vx + 35.0 * 0.75).abs() < 1e-9);
		assert!(nodes[2].vy < 0.0);
		assert!(nodes[3].vx > 0.0);
		let hub_speed = nodes[0].vx.hypot(nodes[0].vy);
		assert!(hub_speed < nodes[1].vx.abs());
	}

	#[test]
	fn padded_rest_length_includes_radii() {
		let graph = fixtures::graph(
			&[("a", "", 10.0, 0.0, 0.0), ("b", "", 5.0, 50.0, 0.0)],
			&[("a", "b")],
		);
		let mut force = LinkForce::new(0.5, 30.0).pad_with_radii(true);
		force.initialize(&graph);
		assert_eq!(force.rest_length(0), Some(30.0 + 23.0 + 13.0));

		let mut plain = LinkForce::new(0.5, 30.0);
		plain.initialize(&graph);
		assert_eq!(plain.rest_length(0), Some(30.0));
	}

	#[test]
	fn zero_strength_is_inert() {
		let mut graph = fixtures::graph(
			&[("a", "", 0.0, 0.0, 0.0), ("b", "", 0.0, 300.0, 40.0)],
			&[("a", "b")],
		);
		let mut rng = SmallRng::seed_from_u64(7);
		let mut force = LinkForce::new(0.0, 30.0);
		force.initialize(&graph);
		force.apply(&mut graph, 1.0, &mut rng);
		assert!(graph.nodes().iter().all(|n| n.vx == 0.0 && n.vy == 0.0));
	}
}
