//! Force-directed layout engine.
//!
//! The engine has no DOM dependency. A [`Simulation`] owns a [`GraphModel`]
//! and an ordered [`ForceRegistry`]; the host calls [`Simulation::frame`] once
//! per display refresh and draws whatever the tick listener reports. The
//! [`InteractionController`] turns abstract pointer input into pins, re-heats
//! and typed [`UiEvent`]s.
//!
//! # Example
//!
//! ```
//! use collab_graph::{GraphData, SimulationConfig};
//! use collab_graph::simulation::{GraphModel, Simulation};
//!
//! let data = GraphData::from_json(r#"{
//!     "nodes": [{"id": "a", "sharedPubs": 3}, {"id": "b", "sharedPubs": 1}],
//!     "links": [{"source": "a", "target": "b"}]
//! }"#).unwrap();
//! let graph = GraphModel::initialize(&data).unwrap();
//! let mut sim = Simulation::from_config(graph, &SimulationConfig::default(), (400.0, 300.0));
//! while sim.frame() {}
//! assert!(sim.is_idle());
//! ```

pub mod forces;
mod integrator;
mod interaction;
mod model;

pub use forces::{
	CenterForce, CollideForce, Force, ForceRegistry, LinkForce, ManyBodyForce,
};
pub use integrator::{RunState, Simulation};
pub use interaction::{
	DIMMED_OPACITY, FULL_OPACITY, Highlight, InteractionController, PointerId, Selection, Slider,
	UiEvent,
};
pub use model::{GraphModel, Link, Node, RADIUS_BASE, RADIUS_PER_PUB};
