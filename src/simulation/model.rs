//! Graph model: an arena of nodes and index-based links.
//!
//! Links never hold references into the node set; `source` and `target` are
//! arena indices resolved once from the dataset's string ids.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::warn;

use crate::data::GraphData;
use crate::error::{GraphError, Result};

const INITIAL_RADIUS: f64 = 10.0;

/// Collision radius added per shared publication.
pub const RADIUS_PER_PUB: f64 = 2.0;
/// Collision radius of a node with no shared publications.
pub const RADIUS_BASE: f64 = 3.0;

/// A researcher together with its simulation state.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Unique id from the dataset.
	pub id: String,
	/// Position of this node in the arena.
	pub index: usize,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Fixed position `(fx, fy)`. While set, integration holds the node here.
	pub pin: Option<(f64, f64)>,
	/// Institution the researcher belongs to.
	pub affiliation: String,
	/// Country of the affiliation.
	pub country: String,
	/// Publications shared with the ego researcher; never negative.
	pub shared_pubs: f64,
}

impl Node {
	/// `shared_pubs * 2 + 3`.
	pub fn collision_radius(&self) -> f64 {
		self.shared_pubs * RADIUS_PER_PUB + RADIUS_BASE
	}

	/// Pinned x, if any.
	pub fn fx(&self) -> Option<f64> {
		self.pin.map(|(fx, _)| fx)
	}

	/// Pinned y, if any.
	pub fn fy(&self) -> Option<f64> {
		self.pin.map(|(_, fy)| fy)
	}

	/// Whether integration holds the node in place.
	pub fn is_pinned(&self) -> bool {
		self.pin.is_some()
	}
}

/// A resolved collaboration between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	/// Position of the link in the dataset.
	pub index: usize,
	/// Arena index of the source node.
	pub source: usize,
	/// Arena index of the target node.
	pub target: usize,
}

/// Nodes and links of one loaded dataset.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: Vec<Node>,
	links: Vec<Link>,
	by_id: HashMap<String, usize>,
}

impl GraphModel {
	/// Builds the arena from a dataset, resolving link endpoints by id.
	///
	/// Fails on the first link that names a missing node, so a model never
	/// exists with a partially resolved link set.
	pub fn initialize(data: &GraphData) -> Result<Self> {
		let mut by_id = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());
		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());

		for (index, node) in data.nodes.iter().enumerate() {
			if by_id.insert(node.id.clone(), index).is_some() {
				return Err(GraphError::DuplicateId {
					id: node.id.clone(),
				});
			}

			let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
			let angle = index as f64 * golden_angle;
			let shared_pubs = if node.shared_pubs.is_finite() && node.shared_pubs >= 0.0 {
				node.shared_pubs
			} else {
				warn!(
					"node `{}` has invalid sharedPubs {}, using 0",
					node.id, node.shared_pubs
				);
				0.0
			};

			nodes.push(Node {
				id: node.id.clone(),
				index,
				x: node.x.unwrap_or_else(|| radius * angle.cos()),
				y: node.y.unwrap_or_else(|| radius * angle.sin()),
				vx: 0.0,
				vy: 0.0,
				pin: None,
				affiliation: node.affiliation.clone(),
				country: node.country.clone(),
				shared_pubs,
			});
		}

		let mut links = Vec::with_capacity(data.links.len());
		for (index, link) in data.links.iter().enumerate() {
			let resolve = |id: &String| {
				by_id
					.get(id)
					.copied()
					.ok_or_else(|| GraphError::DanglingReference {
						link: index,
						id: id.clone(),
					})
			};
			links.push(Link {
				index,
				source: resolve(&link.source)?,
				target: resolve(&link.target)?,
			});
		}

		Ok(Self {
			nodes,
			links,
			by_id,
		})
	}

	/// All nodes in arena order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Mutable nodes, for forces and integration.
	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// All links in dataset order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Node at arena `index`.
	pub fn node(&self, index: usize) -> Option<&Node> {
		self.nodes.get(index)
	}

	/// Mutable node at arena `index`.
	pub fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
		self.nodes.get_mut(index)
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Arena index of the node with `id`.
	pub fn index_of(&self, id: &str) -> Result<usize> {
		self.by_id
			.get(id)
			.copied()
			.ok_or_else(|| GraphError::NotFound { id: id.to_string() })
	}

	/// Node with `id`, or [`GraphError::NotFound`].
	pub fn lookup_node(&self, id: &str) -> Result<&Node> {
		let index = self.index_of(id)?;
		Ok(&self.nodes[index])
	}

	/// Mutable node with `id`, or [`GraphError::NotFound`].
	pub fn lookup_node_mut(&mut self, id: &str) -> Result<&mut Node> {
		let index = self.index_of(id)?;
		Ok(&mut self.nodes[index])
	}

	/// Both endpoints of a link.
	pub fn endpoints(&self, link: &Link) -> (&Node, &Node) {
		(&self.nodes[link.source], &self.nodes[link.target])
	}

	/// Number of link endpoints touching each node. A self-link counts twice.
	pub fn degrees(&self) -> Vec<usize> {
		let mut degrees = vec![0; self.nodes.len()];
		for link in &self.links {
			degrees[link.source] += 1;
			degrees[link.target] += 1;
		}
		degrees
	}

	/// Mean position of all nodes; `None` for an empty graph.
	pub fn centroid(&self) -> Option<(f64, f64)> {
		if self.nodes.is_empty() {
			return None;
		}
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let n = self.nodes.len() as f64;
		Some((sx / n, sy / n))
	}

	/// Fixes a node at `(x, y)`. Returns `false` for an unknown index.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) -> bool {
		match self.nodes.get_mut(index) {
			Some(node) => {
				node.pin = Some((x, y));
				true
			}
			None => false,
		}
	}

	/// Releases a pinned node. Unknown indices are ignored.
	pub fn unpin(&mut self, index: usize) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.pin = None;
		}
	}

	/// Hit test: the last node (topmost when drawn in order) whose disc of
	/// `radius(node)` contains the point.
	pub fn node_at(&self, x: f64, y: f64, radius: impl Fn(&Node) -> f64) -> Option<usize> {
		self.nodes.iter().rev().find_map(|node| {
			let (dx, dy) = (node.x - x, node.y - y);
			let r = radius(node);
			(dx * dx + dy * dy <= r * r).then_some(node.index)
		})
	}
}
