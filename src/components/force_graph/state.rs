//! Per-canvas state: one simulation, its interaction controller and the
//! canvas size.
//!
//! Mouse handlers in the component translate DOM events into the calls below;
//! everything here is plain data so it can be exercised without a browser.

use std::cell::Cell;
use std::rc::Rc;

use log::info;

use super::scale::node_radius;
use crate::config::SimulationConfig;
use crate::data::GraphData;
use crate::error::GraphError;
use crate::simulation::{
	GraphModel, InteractionController, PointerId, Simulation, Slider, UiEvent,
};

/// The mouse is the only pointer a canvas tracks.
const MOUSE: PointerId = 0;

/// Graph simulation plus interaction state for one canvas.
///
/// Created once when the component mounts, then advanced once per animation
/// frame. `dirty` is raised by the tick listener and by interaction changes so
/// the canvas is only redrawn when something moved.
pub struct ForceGraphState {
	/// The layout engine.
	pub sim: Simulation,
	/// Pointer and slider handling.
	pub ui: InteractionController,
	/// Canvas width in CSS pixels.
	pub width: f64,
	/// Canvas height in CSS pixels.
	pub height: f64,
	dirty: Rc<Cell<bool>>,
}

impl ForceGraphState {
	/// Builds the layout for `data`, centred on the canvas middle.
	pub fn new(
		data: &GraphData,
		config: &SimulationConfig,
		width: f64,
		height: f64,
	) -> Result<Self, GraphError> {
		let graph = GraphModel::initialize(data)?;
		let mut sim = Simulation::from_config(graph, config, (width / 2.0, height / 2.0));

		let dirty = Rc::new(Cell::new(true));
		let on_tick = dirty.clone();
		sim.on_tick(move |_| on_tick.set(true));
		sim.on_end(|| info!("collab-graph: layout settled"));

		Ok(Self {
			sim,
			ui: InteractionController::from_config(config).with_hit_radius(node_radius),
			width,
			height,
			dirty,
		})
	}

	/// Advances the layout by at most one tick.
	pub fn frame(&mut self) -> bool {
		self.sim.frame()
	}

	/// Requests a redraw on the next frame.
	pub fn invalidate(&self) {
		self.dirty.set(true);
	}

	/// Whether a redraw is due; clears the flag.
	pub fn take_dirty(&self) -> bool {
		self.dirty.replace(false)
	}

	/// Records the new canvas size and re-centres the layout.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_center(width / 2.0, height / 2.0);
		self.invalidate();
	}

	/// Mouse button pressed at canvas coordinates. Returns whether a node was
	/// grabbed.
	pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
		self.ui.press(&mut self.sim, MOUSE, x, y)
	}

	/// Moves the dragged node, or updates hover when nothing is dragged.
	///
	/// Moves arrive from the whole window so a drag can leave the canvas;
	/// hover is only tracked inside it.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<UiEvent> {
		if self.ui.is_dragging() {
			self.ui.drag_to(&mut self.sim, MOUSE, x, y);
			return None;
		}
		if !self.contains(x, y) {
			return None;
		}
		let event = self.ui.hover(self.sim.graph(), x, y);
		if event.is_some() {
			self.invalidate();
		}
		event
	}

	/// Mouse button released anywhere in the window.
	pub fn pointer_up(&mut self) {
		self.ui.release(&mut self.sim, MOUSE);
	}

	/// Pointer left the canvas: clear hover. A drag in progress keeps going
	/// until the button is released.
	pub fn pointer_leave(&mut self) -> Option<UiEvent> {
		let event = self.ui.hover_leave();
		self.invalidate();
		event
	}

	/// The window lost focus: no release will arrive, so drop every drag.
	pub fn pointer_cancel(&mut self) -> Option<UiEvent> {
		self.ui.cancel_all(&mut self.sim);
		self.pointer_leave()
	}

	fn contains(&self, x: f64, y: f64) -> bool {
		(0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
	}

	/// Click at canvas coordinates.
	pub fn click(&mut self, x: f64, y: f64) -> Option<UiEvent> {
		self.ui.click(self.sim.graph(), x, y)
	}

	/// Raw value from a force slider. Returns whether it was applied.
	pub fn slider_input(&mut self, slider: Slider, raw: &str) -> bool {
		self.ui.slider_input(&mut self.sim, slider, raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::simulation::CenterForce;
	use crate::simulation::forces::CENTER;

	fn state() -> ForceGraphState {
		let data = GraphData::from_json(
			r#"{
				"nodes": [
					{"id": "a", "affiliation": "MIT", "country": "USA", "sharedPubs": 20, "x": 100, "y": 100},
					{"id": "b", "affiliation": "ETH", "country": "UK", "sharedPubs": 1, "x": 300, "y": 100}
				],
				"links": [{"source": "a", "target": "b"}]
			}"#,
		)
		.unwrap();
		ForceGraphState::new(&data, &SimulationConfig::default(), 800.0, 600.0).unwrap()
	}

	#[test]
	fn dangling_links_fail_construction() {
		let data = GraphData::from_json(
			r#"{"nodes": [{"id": "a"}], "links": [{"source": "a", "target": "zz"}]}"#,
		)
		.unwrap();
		let err = ForceGraphState::new(&data, &SimulationConfig::default(), 800.0, 600.0)
			.err()
			.unwrap();
		assert_eq!(
			err,
			GraphError::DanglingReference {
				link: 0,
				id: "zz".to_string()
			}
		);
	}

	#[test]
	fn ticks_mark_the_canvas_dirty() {
		let mut state = state();
		assert!(state.take_dirty());
		assert!(!state.take_dirty());
		assert!(state.frame());
		assert!(state.take_dirty());
	}

	#[test]
	fn hit_testing_uses_the_drawn_radius() {
		let mut state = state();
		// drawn radius of a 20-publication node is 12, collision radius is 43
		assert!(!state.pointer_down(100.0, 125.0));
		assert!(state.pointer_down(100.0, 110.0));
		assert!(state.sim.graph().nodes()[0].is_pinned());
		state.pointer_up();
		assert!(!state.sim.graph().nodes()[0].is_pinned());
	}

	#[test]
	fn leaving_the_canvas_clears_hover_but_keeps_the_drag() {
		let mut state = state();
		assert_eq!(
			state.pointer_move(300.0, 100.0),
			Some(UiEvent::NodeHovered(Some("ETH".to_string())))
		);
		assert!(state.pointer_down(300.0, 100.0));
		assert_eq!(state.pointer_move(320.0, 120.0), None);
		assert_eq!(state.pointer_leave(), Some(UiEvent::NodeHovered(None)));
		assert_eq!(state.ui.active_drags(), 1);
		assert_eq!(state.sim.alpha_target(), 0.3);

		// still following the pointer outside the canvas
		assert_eq!(state.pointer_move(-50.0, 900.0), None);
		assert_eq!(state.sim.graph().nodes()[1].pin, Some((-50.0, 900.0)));

		state.pointer_up();
		assert_eq!(state.ui.active_drags(), 0);
		assert!(!state.sim.graph().nodes()[1].is_pinned());
		assert_eq!(state.sim.alpha_target(), 0.0);
	}

	#[test]
	fn hover_is_not_tracked_outside_the_canvas() {
		let mut state = state();
		assert_eq!(state.pointer_move(-5.0, 100.0), None);
		assert_eq!(state.ui.hovered(), None);
	}

	#[test]
	fn losing_focus_mid_drag_does_not_eat_the_next_click() {
		let mut state = state();
		assert!(state.pointer_down(100.0, 100.0));
		assert_eq!(state.pointer_move(150.0, 150.0), None);
		state.pointer_cancel();
		assert_eq!(state.ui.active_drags(), 0);
		assert!(!state.sim.graph().nodes()[0].is_pinned());

		assert!(!state.pointer_down(700.0, 500.0));
		state.pointer_up();
		assert_eq!(state.click(700.0, 500.0), Some(UiEvent::BackgroundClicked));
	}

	#[test]
	fn drag_released_outside_the_canvas_does_not_eat_the_next_click() {
		let mut state = state();
		assert!(state.pointer_down(100.0, 100.0));
		assert_eq!(state.pointer_leave(), None);
		assert_eq!(state.pointer_move(-20.0, -20.0), None);
		// the browser fires no click on the canvas for this release
		state.pointer_up();

		assert!(!state.pointer_down(700.0, 500.0));
		state.pointer_up();
		assert_eq!(state.click(700.0, 500.0), Some(UiEvent::BackgroundClicked));
	}

	#[test]
	fn resize_moves_the_centering_target() {
		let mut state = state();
		state.resize(1000.0, 400.0);
		assert_eq!(
			state.sim.force::<CenterForce>(CENTER).map(CenterForce::target),
			Some((500.0, 200.0))
		);
	}
}
