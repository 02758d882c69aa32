//! collab-graph: interactive force-directed layout of research collaboration
//! networks.
//!
//! The [`simulation`] module is a DOM-free layout engine (graph model, force
//! registry, integrator and interaction controller). The
//! [`components::force_graph`] canvas component drives it from the browser's
//! animation loop and draws the result.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;
pub mod config;
pub mod data;
pub mod error;
pub mod simulation;

pub use components::force_graph::ForceGraphCanvas;
pub use config::SimulationConfig;
pub use data::{GraphData, GraphLink, GraphNode};
pub use error::{DataLoadError, GraphError};

/// Element holding the dataset JSON.
pub const GRAPH_DATA_ID: &str = "graph-data";
/// Element holding the optional configuration JSON.
pub const GRAPH_CONFIG_ID: &str = "graph-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("collab-graph: logging initialized");
}

/// Text content of the `<script>` element with the given id.
fn read_script(id: &str) -> Result<String, DataLoadError> {
	let missing = || DataLoadError::MissingSource(id.to_string());
	let document = web_sys::window()
		.and_then(|window| window.document())
		.ok_or_else(missing)?;
	let script: HtmlScriptElement = document
		.get_element_by_id(id)
		.and_then(|element| element.dyn_into().ok())
		.ok_or_else(missing)?;
	script.text().map_err(|_| missing())
}

/// Load graph data from the script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
pub fn load_graph_data() -> Result<GraphData, DataLoadError> {
	let data = GraphData::from_json(&read_script(GRAPH_DATA_ID)?)?;
	info!(
		"collab-graph: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Ok(data)
}

/// Load simulation parameters from id="graph-config", falling back to the
/// defaults when the element is absent or invalid.
pub fn load_config() -> SimulationConfig {
	match read_script(GRAPH_CONFIG_ID).and_then(|text| SimulationConfig::from_json(&text)) {
		Ok(config) => config,
		Err(DataLoadError::MissingSource(_)) => {
			debug!("collab-graph: no configuration element, using defaults");
			SimulationConfig::default()
		}
		Err(e) => {
			warn!("collab-graph: ignoring configuration: {e}");
			SimulationConfig::default()
		}
	}
}

/// Main application component.
/// Loads the dataset from the DOM and renders the collaboration graph, or an
/// error message when the dataset cannot be read.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph = match load_graph_data() {
		Ok(data) => {
			let config = load_config();
			let graph_signal = Signal::derive(move || data.clone());
			view! { <ForceGraphCanvas data=graph_signal config=config fullscreen=true /> }
				.into_any()
		}
		Err(e) => {
			error!("collab-graph: {e}");
			view! {
				<p class="graph-error">{format!("Could not load the collaboration graph: {e}")}</p>
			}
			.into_any()
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Research Collaboration Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			{graph}
			<div class="graph-overlay">
				<h1>"Collaboration Network"</h1>
				<p class="subtitle">
					"Drag nodes to reposition. Hover to highlight an affiliation. Click for details."
				</p>
			</div>
		</div>
	}
}
