//! Point quadtree with per-cell centre of mass, used by the Barnes-Hut pass.

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
	pub(super) cx: f64,
	pub(super) cy: f64,
	pub(super) half_extent: f64,
}

impl QuadBounds {
	fn from_points(points: &[(f64, f64)]) -> Option<Self> {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}

		if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
			return None;
		}

		let span = (max_x - min_x).max(max_y - min_y).max(1.0);
		Some(Self {
			cx: (min_x + max_x) * 0.5,
			cy: (min_y + max_y) * 0.5,
			half_extent: span * 0.5 + 1.0,
		})
	}

	pub(super) fn contains(self, x: f64, y: f64) -> bool {
		(x - self.cx).abs() <= self.half_extent && (y - self.cy).abs() <= self.half_extent
	}

	pub(super) fn width(self) -> f64 {
		self.half_extent * 2.0
	}

	fn quadrant_for(self, x: f64, y: f64) -> usize {
		match (x >= self.cx, y >= self.cy) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let (ox, oy) = match quadrant {
			0 => (-quarter, -quarter),
			1 => (quarter, -quarter),
			2 => (-quarter, quarter),
			_ => (quarter, quarter),
		};
		Self {
			cx: self.cx + ox,
			cy: self.cy + oy,
			half_extent: quarter,
		}
	}
}

pub(super) struct QuadNode {
	pub(super) bounds: QuadBounds,
	/// Centre of mass of every point below this cell.
	pub(super) com: (f64, f64),
	/// Number of points below this cell.
	pub(super) mass: f64,
	/// Point indices; only populated on leaves.
	pub(super) indices: Vec<usize>,
	pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	pub(super) fn build(points: &[(f64, f64)]) -> Option<Self> {
		let bounds = QuadBounds::from_points(points)?;
		Some(Self::build_node(bounds, (0..points.len()).collect(), points, 0))
	}

	fn build_node(
		bounds: QuadBounds,
		indices: Vec<usize>,
		points: &[(f64, f64)],
		depth: usize,
	) -> Self {
		let (sx, sy) = indices
			.iter()
			.fold((0.0, 0.0), |(sx, sy), &i| (sx + points[i].0, sy + points[i].1));
		let mass = indices.len() as f64;
		let com = if mass > 0.0 {
			(sx / mass, sy / mass)
		} else {
			(bounds.cx, bounds.cy)
		};

		let mut node = Self {
			bounds,
			com,
			mass,
			indices,
			children: std::array::from_fn(|_| None),
		};

		if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
			return node;
		}

		let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
		for &i in &node.indices {
			buckets[bounds.quadrant_for(points[i].0, points[i].1)].push(i);
		}
		if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
			// Everything in one quadrant: keep subdividing that quadrant only.
			let quadrant = buckets.iter().position(|bucket| !bucket.is_empty());
			if let Some(quadrant) = quadrant {
				let bucket = std::mem::take(&mut buckets[quadrant]);
				node.children[quadrant] = Some(Box::new(Self::build_node(
					bounds.child(quadrant),
					bucket,
					points,
					depth + 1,
				)));
				node.indices.clear();
			}
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				points,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	pub(super) fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}
}
