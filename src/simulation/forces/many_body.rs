use rand::rngs::SmallRng;

use super::quadtree::QuadNode;
use super::{Force, jiggle};
use crate::simulation::model::GraphModel;

/// Inverse-square charge between every pair of nodes.
///
/// Each node receives `delta * strength * alpha / d²` from every other node,
/// where `delta` points from the node to the other one; negative strength
/// therefore repels. Graphs up to `direct_limit` nodes use the exact pairwise
/// pass, larger ones a Barnes-Hut quadtree.
#[derive(Clone, Debug)]
pub struct ManyBodyForce {
	strength: f64,
	theta2: f64,
	distance_min2: f64,
	distance_max2: f64,
	direct_limit: usize,
	positions: Vec<(f64, f64)>,
}

impl ManyBodyForce {
	/// Charge of `strength` on every node; negative repels.
	pub fn new(strength: f64) -> Self {
		Self {
			strength,
			theta2: 0.81,
			distance_min2: 1.0,
			distance_max2: f64::INFINITY,
			direct_limit: 200,
			positions: Vec::new(),
		}
	}

	/// Barnes-Hut opening criterion. Smaller is more accurate.
	pub fn theta(mut self, theta: f64) -> Self {
		self.theta2 = theta * theta;
		self
	}

	/// Distances below this are clamped, bounding the force between close
	/// nodes.
	pub fn distance_min(mut self, distance: f64) -> Self {
		self.distance_min2 = distance * distance;
		self
	}

	/// Pairs farther apart than `distance` do not interact. `None` is unbounded.
	pub fn distance_max(mut self, distance: Option<f64>) -> Self {
		self.distance_max2 = distance.map_or(f64::INFINITY, |d| d * d);
		self
	}

	/// Largest graph handled by the exact pairwise pass.
	pub fn direct_limit(mut self, limit: usize) -> Self {
		self.direct_limit = limit;
		self
	}

	/// Charge per node.
	pub fn strength(&self) -> f64 {
		self.strength
	}

	/// Changes the charge; takes effect on the next tick.
	pub fn set_strength(&mut self, strength: f64) {
		self.strength = strength;
	}

	/// Velocity delta on a node from a body of `weight` at offset `(x, y)`.
	fn pull(
		&self,
		mut x: f64,
		mut y: f64,
		weight: f64,
		alpha: f64,
		rng: &mut SmallRng,
	) -> Option<(f64, f64)> {
		let mut l = x * x + y * y;
		if l >= self.distance_max2 {
			return None;
		}
		if x == 0.0 {
			x = jiggle(rng);
			l += x * x;
		}
		if y == 0.0 {
			y = jiggle(rng);
			l += y * y;
		}
		if l < self.distance_min2 {
			l = (self.distance_min2 * l).sqrt();
		}
		let k = self.strength * weight * alpha / l;
		Some((x * k, y * k))
	}

	fn apply_direct(&self, deltas: &mut [(f64, f64)], alpha: f64, rng: &mut SmallRng) {
		let points = &self.positions;
		for (i, &(xi, yi)) in points.iter().enumerate() {
			for (j, &(xj, yj)) in points.iter().enumerate() {
				if i == j {
					continue;
				}
				if let Some((dx, dy)) = self.pull(xj - xi, yj - yi, 1.0, alpha, rng) {
					deltas[i].0 += dx;
					deltas[i].1 += dy;
				}
			}
		}
	}

	fn accumulate(
		&self,
		cell: &QuadNode,
		index: usize,
		alpha: f64,
		rng: &mut SmallRng,
		delta: &mut (f64, f64),
	) {
		if cell.mass == 0.0 {
			return;
		}
		let (px, py) = self.positions[index];

		if cell.is_leaf() {
			for &other in &cell.indices {
				if other == index {
					continue;
				}
				let (ox, oy) = self.positions[other];
				if let Some((dx, dy)) = self.pull(ox - px, oy - py, 1.0, alpha, rng) {
					delta.0 += dx;
					delta.1 += dy;
				}
			}
			return;
		}

		let (x, y) = (cell.com.0 - px, cell.com.1 - py);
		let width = cell.bounds.width();
		let l = x * x + y * y;
		if !cell.bounds.contains(px, py) && width * width / l < self.theta2 {
			if let Some((dx, dy)) = self.pull(x, y, cell.mass, alpha, rng) {
				delta.0 += dx;
				delta.1 += dy;
			}
			return;
		}

		for child in cell.children.iter().flatten() {
			self.accumulate(child, index, alpha, rng, delta);
		}
	}
}

impl Force for ManyBodyForce {
	fn apply(&mut self, graph: &mut GraphModel, alpha: f64, rng: &mut SmallRng) {
		if graph.len() < 2 || self.strength == 0.0 {
			return;
		}

		self.positions.clear();
		self.positions
			.extend(graph.nodes().iter().map(|node| (node.x, node.y)));
		let mut deltas = vec![(0.0, 0.0); self.positions.len()];

		if self.positions.len() <= self.direct_limit {
			self.apply_direct(&mut deltas, alpha, rng);
		} else if let Some(tree) = QuadNode::build(&self.positions) {
			for (index, delta) in deltas.iter_mut().enumerate() {
				self.accumulate(&tree, index, alpha, rng, delta);
			}
		}

		for (node, (dx, dy)) in graph.nodes_mut().iter_mut().zip(deltas) {
			node.vx += dx;
			node.vy += dy;
		}
	}
}
