//! End-to-end layout scenarios driven through the public engine API.

use collab_graph::simulation::forces::{CENTER, CHARGE, LINK};
use collab_graph::simulation::{
	CollideForce, GraphModel, InteractionController, LinkForce, Simulation, UiEvent,
};
use collab_graph::{GraphData, GraphError, GraphLink, GraphNode, SimulationConfig};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const NETWORK: &str = r#"{
	"nodes": [
		{"id": "Ada",   "affiliation": "MIT",      "country": "USA",     "sharedPubs": 6},
		{"id": "Bo",    "affiliation": "MIT",      "country": "USA",     "sharedPubs": 2},
		{"id": "Chen",  "affiliation": "Tsinghua", "country": "China",   "sharedPubs": 4},
		{"id": "Dara",  "affiliation": "ETH",      "country": "Germany", "sharedPubs": 1},
		{"id": "Eli",   "affiliation": "ETH",      "country": "Germany", "sharedPubs": 3},
		{"id": "Femi",  "affiliation": "UNILAG",   "country": "Nigeria", "sharedPubs": 0}
	],
	"links": [
		{"source": "Ada",  "target": "Bo"},
		{"source": "Ada",  "target": "Chen"},
		{"source": "Chen", "target": "Dara"},
		{"source": "Dara", "target": "Eli"},
		{"source": "Eli",  "target": "Femi"},
		{"source": "Bo",   "target": "Eli"}
	]
}"#;

fn network() -> Simulation {
	let data = GraphData::from_json(NETWORK).unwrap();
	let graph = GraphModel::initialize(&data).unwrap();
	Simulation::from_config(graph, &SimulationConfig::default(), (400.0, 300.0))
}

fn node(id: &str, shared_pubs: f64, x: f64, y: f64) -> GraphNode {
	GraphNode {
		id: id.to_string(),
		affiliation: String::new(),
		country: String::new(),
		shared_pubs,
		x: Some(x),
		y: Some(y),
	}
}

#[test]
fn linked_pair_settles_near_rest_length() {
	let mut rng = SmallRng::seed_from_u64(42);
	for _ in 0..5 {
		let data = GraphData {
			nodes: vec![
				node(
					"A",
					10.0,
					rng.random_range(0.0..800.0),
					rng.random_range(0.0..600.0),
				),
				node(
					"B",
					5.0,
					rng.random_range(0.0..800.0),
					rng.random_range(0.0..600.0),
				),
			],
			links: vec![GraphLink {
				source: "A".to_string(),
				target: "B".to_string(),
			}],
		};
		let graph = GraphModel::initialize(&data).unwrap();
		let mut sim = Simulation::from_config(graph, &SimulationConfig::default(), (400.0, 300.0));

		while sim.frame() {}
		assert_eq!(sim.tick_count(), 300);
		assert!(sim.alpha() < sim.alpha_min());

		let desired = sim
			.force::<LinkForce>(LINK)
			.and_then(|link| link.rest_length(0))
			.unwrap();
		assert_eq!(desired, 30.0 + 23.0 + 13.0);
		let (a, b) = (&sim.graph().nodes()[0], &sim.graph().nodes()[1]);
		let distance = (a.x - b.x).hypot(a.y - b.y);
		assert!(
			distance >= 0.8 * desired && distance <= 1.2 * desired,
			"distance {distance} vs desired {desired}"
		);
	}
}

#[test]
fn network_settles_around_the_center() {
	let mut sim = network();
	while sim.frame() {}

	assert!(sim.is_idle());
	for node in sim.graph().nodes() {
		assert!(node.x.is_finite() && node.y.is_finite(), "{} diverged", node.id);
	}
	let (cx, cy) = sim.graph().centroid().unwrap();
	assert!((cx - 400.0).abs() < 1.0 && (cy - 300.0).abs() < 1.0);
}

#[test]
fn strong_collision_keeps_discs_apart() {
	let mut sim = network();
	sim.set_force_enabled(LINK, false);
	sim.set_force_enabled(CHARGE, false);
	sim.add_force("collide", CollideForce::new().iterations(3));
	while sim.frame() {}

	let nodes = sim.graph().nodes();
	for (i, a) in nodes.iter().enumerate() {
		for b in &nodes[i + 1..] {
			let gap = (a.x - b.x).hypot(a.y - b.y) - a.collision_radius() - b.collision_radius();
			assert!(gap > -1.0, "{} and {} overlap by {}", a.id, b.id, -gap);
		}
	}
}

#[test]
fn dragging_a_node_to_a_point_and_releasing() {
	let mut sim = network();
	let mut ui = InteractionController::from_config(&SimulationConfig::default());
	for _ in 0..20 {
		sim.frame();
	}

	assert!(ui.press_node(&mut sim, 7, 0));
	let ada = sim.graph().lookup_node("Ada").unwrap();
	assert_eq!(ada.fx(), Some(ada.x));
	assert_eq!(ada.fy(), Some(ada.y));
	assert_eq!(sim.alpha_target(), 0.3);

	assert!(ui.drag_to(&mut sim, 7, 100.0, 100.0));
	for _ in 0..30 {
		sim.frame();
	}
	let ada = sim.graph().lookup_node("Ada").unwrap();
	assert_eq!((ada.x, ada.y), (100.0, 100.0));
	assert!(!sim.is_idle());

	assert!(ui.release(&mut sim, 7));
	let ada = sim.graph().lookup_node("Ada").unwrap();
	assert_eq!(ada.pin, None);
	assert_eq!(sim.alpha_target(), 0.0);

	while sim.frame() {}
	assert!(sim.is_idle());
}

#[test]
fn hovering_an_mit_node_dims_everything_else() {
	let sim = network();
	let graph = sim.graph();
	let mut ui = InteractionController::new();
	let bo = graph.index_of("Bo").unwrap();

	assert_eq!(
		ui.hover_enter(graph, bo),
		Some(UiEvent::NodeHovered(Some("MIT".to_string())))
	);
	let highlight = ui.highlight();
	for node in graph.nodes() {
		let expected = if node.affiliation == "MIT" { 1.0 } else { 0.2 };
		assert_eq!(highlight.node_opacity(node), expected, "{}", node.id);
	}
	for link in graph.links() {
		let (source, target) = graph.endpoints(link);
		let touches_mit = source.affiliation == "MIT" || target.affiliation == "MIT";
		let expected = if touches_mit { 1.0 } else { 0.2 };
		assert_eq!(highlight.link_opacity(graph, link), expected);
	}

	assert_eq!(ui.hover_leave(), Some(UiEvent::NodeHovered(None)));
	let highlight = ui.highlight();
	assert!(graph.nodes().iter().all(|n| highlight.node_opacity(n) == 1.0));
	assert!(
		graph
			.links()
			.iter()
			.all(|l| highlight.link_opacity(graph, l) == 1.0)
	);
}

#[test]
fn independent_simulations_do_not_interfere() {
	let mut first = network();
	let mut second = network();
	first.set_charge_strength(-800.0);
	second.set_center(0.0, 0.0);
	assert_eq!(
		second
			.force::<collab_graph::simulation::CenterForce>(CENTER)
			.map(|center| center.target()),
		Some((0.0, 0.0))
	);

	while first.frame() {}
	assert!(!second.is_idle());
	assert_eq!(second.tick_count(), 0);
}

#[test]
fn broken_datasets_are_rejected() {
	let dangling = GraphData::from_json(
		r#"{"nodes": [{"id": "a"}, {"id": "b"}],
		    "links": [{"source": "a", "target": "b"}, {"source": "b", "target": "ghost"}]}"#,
	)
	.unwrap();
	assert_eq!(
		GraphModel::initialize(&dangling).err(),
		Some(GraphError::DanglingReference {
			link: 1,
			id: "ghost".to_string()
		})
	);

	let duplicate = GraphData::from_json(r#"{"nodes": [{"id": "a"}, {"id": "a"}]}"#).unwrap();
	assert_eq!(
		GraphModel::initialize(&duplicate).err(),
		Some(GraphError::DuplicateId {
			id: "a".to_string()
		})
	);

	assert!(GraphData::from_json(r#"{"nodes": [{"id": 1}]}"#).is_err());
}
