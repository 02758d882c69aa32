use rand::rngs::SmallRng;

use super::Force;
use crate::simulation::model::GraphModel;

/// Translates the whole graph so its centroid moves toward a target point.
///
/// Positions are shifted directly and alpha is ignored, so the graph stays
/// centred even while the simulation is cooling.
#[derive(Clone, Debug)]
pub struct CenterForce {
	x: f64,
	y: f64,
	strength: f64,
}

impl CenterForce {
	/// Centering toward `(x, y)` at full strength.
	pub fn new(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			strength: 1.0,
		}
	}

	/// Fraction of the centroid offset removed per tick.
	pub fn strength(mut self, strength: f64) -> Self {
		self.strength = strength;
		self
	}

	/// Current target point.
	pub fn target(&self) -> (f64, f64) {
		(self.x, self.y)
	}

	/// Moves the target, e.g. after the canvas is resized.
	pub fn set_target(&mut self, x: f64, y: f64) {
		self.x = x;
		self.y = y;
	}
}

impl Force for CenterForce {
	fn apply(&mut self, graph: &mut GraphModel, _alpha: f64, _rng: &mut SmallRng) {
		let Some((cx, cy)) = graph.centroid() else {
			return;
		};
		let (sx, sy) = ((cx - self.x) * self.strength, (cy - self.y) * self.strength);
		for node in graph.nodes_mut() {
			node.x -= sx;
			node.y -= sy;
		}
	}
}
