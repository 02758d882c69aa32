//! Pointer input to simulation effects.
//!
//! The controller never touches the DOM. The host feeds it positions in graph
//! coordinates and a pointer id; it pins and re-heats through the
//! [`Simulation`] it is handed and answers with [`UiEvent`]s for the view.

use std::collections::HashMap;

use log::debug;

use super::integrator::Simulation;
use super::model::{GraphModel, Link, Node};
use crate::config::{DRAG_ALPHA_TARGET, SimulationConfig};

/// Identifies one pointer (mouse, pen or touch point).
pub type PointerId = u32;

/// Opacity of highlighted or unfiltered elements.
pub const FULL_OPACITY: f64 = 1.0;
/// Opacity of elements outside the hovered affiliation.
pub const DIMMED_OPACITY: f64 = 0.2;

/// Affiliation currently emphasised by hover, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
	affiliation: Option<String>,
}

impl Highlight {
	/// The highlighted affiliation.
	pub fn affiliation(&self) -> Option<&str> {
		self.affiliation.as_deref()
	}

	/// Whether anything is highlighted.
	pub fn is_active(&self) -> bool {
		self.affiliation.is_some()
	}

	fn matches(&self, node: &Node) -> bool {
		self.affiliation
			.as_deref()
			.is_none_or(|affiliation| node.affiliation == affiliation)
	}

	/// Full opacity for matching nodes, or for every node when inactive.
	pub fn node_opacity(&self, node: &Node) -> f64 {
		if self.matches(node) {
			FULL_OPACITY
		} else {
			DIMMED_OPACITY
		}
	}

	/// A link stays opaque when either endpoint matches.
	pub fn link_opacity(&self, graph: &GraphModel, link: &Link) -> f64 {
		let (source, target) = graph.endpoints(link);
		if self.matches(source) || self.matches(target) {
			FULL_OPACITY
		} else {
			DIMMED_OPACITY
		}
	}
}

/// Details of a clicked node, for the tooltip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
	/// Researcher id.
	pub id: String,
	/// Researcher affiliation.
	pub affiliation: String,
	/// Affiliation country.
	pub country: String,
}

impl From<&Node> for Selection {
	fn from(node: &Node) -> Self {
		Self {
			id: node.id.clone(),
			affiliation: node.affiliation.clone(),
			country: node.country.clone(),
		}
	}
}

/// Events surfaced to the view layer.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
	/// A node was clicked; show its details near `(x, y)`.
	NodeClicked {
		/// The clicked node.
		selection: Selection,
		/// Click position in graph coordinates.
		x: f64,
		/// Click position in graph coordinates.
		y: f64,
	},
	/// Empty canvas was clicked; any selection is cleared.
	BackgroundClicked,
	/// The hovered affiliation changed; `None` when the pointer left all nodes.
	NodeHovered(Option<String>),
}

/// Runtime-tunable force strengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slider {
	/// Many-body strength.
	Charge,
	/// Link strength.
	Link,
}

impl Slider {
	/// Accepted `(min, max)`; input outside it is clamped.
	pub fn range(self) -> (f64, f64) {
		match self {
			Slider::Charge => (-1000.0, 0.0),
			Slider::Link => (0.0, 1.0),
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct Drag {
	node: usize,
	moved: bool,
}

/// Drag, hover, click and slider handling for one simulation.
#[derive(Clone, Debug)]
pub struct InteractionController {
	drags: HashMap<PointerId, Drag>,
	drag_alpha_target: f64,
	hit_radius: fn(&Node) -> f64,
	hovered: Option<usize>,
	highlight: Highlight,
	selection: Option<Selection>,
	swallow_click: bool,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self {
			drags: HashMap::new(),
			drag_alpha_target: DRAG_ALPHA_TARGET,
			hit_radius: Node::collision_radius,
			hovered: None,
			highlight: Highlight::default(),
			selection: None,
			swallow_click: false,
		}
	}
}

impl InteractionController {
	/// A controller with default drag temperature and collision-radius hit testing.
	pub fn new() -> Self {
		Self::default()
	}

	/// A controller using the configured drag alpha target.
	pub fn from_config(config: &SimulationConfig) -> Self {
		Self {
			drag_alpha_target: config.drag_alpha_target,
			..Self::default()
		}
	}

	/// Radius used for hit-testing; should match the radius nodes are drawn at.
	pub fn with_hit_radius(mut self, hit_radius: fn(&Node) -> f64) -> Self {
		self.hit_radius = hit_radius;
		self
	}

	/// Topmost node under `(x, y)`.
	pub fn node_at(&self, graph: &GraphModel, x: f64, y: f64) -> Option<usize> {
		graph.node_at(x, y, self.hit_radius)
	}

	/// Starts a drag if the pointer is over a node. Returns whether it was.
	///
	/// Every press starts a fresh click, so a swallow left over from a drag
	/// whose release produced no click is dropped here.
	pub fn press(&mut self, sim: &mut Simulation, pointer: PointerId, x: f64, y: f64) -> bool {
		self.swallow_click = false;
		match self.node_at(sim.graph(), x, y) {
			Some(index) => self.press_node(sim, pointer, index),
			None => false,
		}
	}

	/// Starts dragging `index` with `pointer`, pinning it where it stands.
	///
	/// The first concurrent drag keeps the simulation warm; later ones only pin.
	pub fn press_node(&mut self, sim: &mut Simulation, pointer: PointerId, index: usize) -> bool {
		if self.drags.contains_key(&pointer) {
			return false;
		}
		let Some(node) = sim.graph().node(index) else {
			return false;
		};
		let (x, y) = (node.x, node.y);

		if self.drags.is_empty() {
			sim.set_alpha_target(self.drag_alpha_target);
			sim.restart();
		}
		sim.graph_mut().pin(index, x, y);
		self.drags.insert(pointer, Drag { node: index, moved: false });
		self.swallow_click = false;
		debug!("drag start: pointer {pointer} on node {index}");
		true
	}

	/// Moves the pin of the node held by `pointer`.
	pub fn drag_to(&mut self, sim: &mut Simulation, pointer: PointerId, x: f64, y: f64) -> bool {
		let Some(drag) = self.drags.get_mut(&pointer) else {
			return false;
		};
		drag.moved = true;
		sim.graph_mut().pin(drag.node, x, y)
	}

	/// Ends the drag held by `pointer`. Cools the simulation once no drag is
	/// left and frees the node unless another pointer still holds it.
	pub fn release(&mut self, sim: &mut Simulation, pointer: PointerId) -> bool {
		let Some(drag) = self.drags.remove(&pointer) else {
			return false;
		};

		if self.drags.is_empty() {
			sim.set_alpha_target(0.0);
		}
		if !self.drags.values().any(|other| other.node == drag.node) {
			sim.graph_mut().unpin(drag.node);
		}
		if drag.moved {
			self.swallow_click = true;
		}
		debug!("drag end: pointer {pointer}, {} still active", self.drags.len());
		true
	}

	/// Releases every active drag, e.g. when the window loses focus. No click
	/// follows a cancel, so nothing is left to swallow.
	pub fn cancel_all(&mut self, sim: &mut Simulation) {
		let pointers: Vec<PointerId> = self.drags.keys().copied().collect();
		for pointer in pointers {
			self.release(sim, pointer);
		}
		self.swallow_click = false;
	}

	/// Number of pointers currently dragging.
	pub fn active_drags(&self) -> usize {
		self.drags.len()
	}

	/// Whether any pointer is dragging.
	pub fn is_dragging(&self) -> bool {
		!self.drags.is_empty()
	}

	/// Hover tracking from a pointer position. Emits only on enter or leave,
	/// and not at all while a drag is in progress.
	pub fn hover(&mut self, graph: &GraphModel, x: f64, y: f64) -> Option<UiEvent> {
		if self.is_dragging() {
			return None;
		}
		let hit = self.node_at(graph, x, y);
		if hit == self.hovered {
			return None;
		}
		match hit {
			Some(index) => self.hover_enter(graph, index),
			None => self.hover_leave(),
		}
	}

	/// Marks `index` as hovered and highlights its affiliation.
	pub fn hover_enter(&mut self, graph: &GraphModel, index: usize) -> Option<UiEvent> {
		let node = graph.node(index)?;
		self.hovered = Some(index);
		self.highlight = Highlight {
			affiliation: Some(node.affiliation.clone()),
		};
		Some(UiEvent::NodeHovered(Some(node.affiliation.clone())))
	}

	/// Clears hover. Emits only if something was hovered.
	pub fn hover_leave(&mut self) -> Option<UiEvent> {
		self.hovered.take()?;
		self.highlight = Highlight::default();
		Some(UiEvent::NodeHovered(None))
	}

	/// Index of the hovered node.
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Current highlight, for rendering.
	pub fn highlight(&self) -> &Highlight {
		&self.highlight
	}

	/// Click at `(x, y)`. The click that ends a drag which moved its node is
	/// swallowed and yields `None`.
	pub fn click(&mut self, graph: &GraphModel, x: f64, y: f64) -> Option<UiEvent> {
		if std::mem::take(&mut self.swallow_click) {
			return None;
		}
		match self.node_at(graph, x, y).and_then(|index| graph.node(index)) {
			Some(node) => {
				let selection = Selection::from(node);
				self.selection = Some(selection.clone());
				Some(UiEvent::NodeClicked { selection, x, y })
			}
			None => {
				self.selection = None;
				Some(UiEvent::BackgroundClicked)
			}
		}
	}

	/// Node shown in the tooltip, if any.
	pub fn selection(&self) -> Option<&Selection> {
		self.selection.as_ref()
	}

	/// Applies raw slider text. Unparseable or non-finite input is dropped
	/// without re-heating; valid input is clamped to [`Slider::range`].
	pub fn slider_input(&self, sim: &mut Simulation, slider: Slider, raw: &str) -> bool {
		let value = match raw.trim().parse::<f64>() {
			Ok(value) if value.is_finite() => value,
			_ => {
				debug!("ignoring {slider:?} slider input {raw:?}");
				return false;
			}
		};
		let (min, max) = slider.range();
		let value = value.clamp(min, max);
		match slider {
			Slider::Charge => sim.set_charge_strength(value),
			Slider::Link => sim.set_link_strength(value),
		}
	}
}
