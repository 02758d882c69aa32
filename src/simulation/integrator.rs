//! Simulation loop: applies forces, integrates positions and cools alpha.
//!
//! The loop never schedules itself. The host calls [`Simulation::frame`] once
//! per display refresh; a frame performs at most one tick, so repeated
//! [`Simulation::restart`] calls cannot stack up extra ticks.

use std::fmt;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::forces::{
	self, CenterForce, CollideForce, Force, ForceRegistry, LinkForce, ManyBodyForce,
};
use super::model::GraphModel;
use crate::config::SimulationConfig;

/// Whether frames currently advance the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
	/// Each frame performs one tick.
	Running,
	/// Frames do nothing until the next restart.
	Idle,
}

type TickListener = Box<dyn FnMut(&GraphModel)>;
type EndListener = Box<dyn FnMut()>;

/// One layout session: graph, forces, temperature and listeners.
///
/// Independent sessions can coexist; nothing here is global.
pub struct Simulation {
	graph: GraphModel,
	forces: ForceRegistry,
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
	state: RunState,
	ticks: u64,
	rng: SmallRng,
	on_tick: Option<TickListener>,
	on_end: Option<EndListener>,
}

impl fmt::Debug for Simulation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Simulation")
			.field("nodes", &self.graph.len())
			.field("links", &self.graph.links().len())
			.field("forces", &self.forces)
			.field("alpha", &self.alpha)
			.field("alpha_target", &self.alpha_target)
			.field("state", &self.state)
			.field("ticks", &self.ticks)
			.finish_non_exhaustive()
	}
}

impl Simulation {
	/// A running simulation with no forces and default temperature settings.
	pub fn new(graph: GraphModel) -> Self {
		let defaults = SimulationConfig::default();
		Self {
			graph,
			forces: ForceRegistry::default(),
			alpha: 1.0,
			alpha_min: defaults.alpha_min,
			alpha_decay: defaults.alpha_decay,
			alpha_target: 0.0,
			velocity_decay: defaults.velocity_decay,
			state: RunState::Running,
			ticks: 0,
			rng: SmallRng::seed_from_u64(defaults.seed),
			on_tick: None,
			on_end: None,
		}
	}

	/// A simulation with the standard `link`, `charge`, `center` and `collide`
	/// forces configured from `config`, centred on `center`.
	pub fn from_config(graph: GraphModel, config: &SimulationConfig, center: (f64, f64)) -> Self {
		let mut sim = Self::new(graph);
		sim.alpha_min = config.alpha_min;
		sim.alpha_decay = config.alpha_decay;
		sim.velocity_decay = config.velocity_decay;
		sim.rng = SmallRng::seed_from_u64(config.seed);

		sim.add_force(
			forces::LINK,
			LinkForce::new(config.link.strength, config.link.distance)
				.pad_with_radii(config.link.pad_with_radii)
				.iterations(config.link.iterations),
		);
		sim.add_force(
			forces::CHARGE,
			ManyBodyForce::new(config.charge.strength)
				.theta(config.charge.theta)
				.distance_min(config.charge.distance_min)
				.distance_max(config.charge.distance_max)
				.direct_limit(config.charge.direct_limit),
		);
		sim.add_force(
			forces::CENTER,
			CenterForce::new(center.0, center.1).strength(config.center.strength),
		);
		sim.add_force(
			forces::COLLIDE,
			CollideForce::new()
				.strength(config.collide.strength)
				.iterations(config.collide.iterations),
		);

		info!(
			"simulation ready: {} nodes, {} links",
			sim.graph.len(),
			sim.graph.links().len()
		);
		sim
	}

	/// The graph being laid out.
	pub fn graph(&self) -> &GraphModel {
		&self.graph
	}

	/// Mutable graph, e.g. for pinning.
	pub fn graph_mut(&mut self) -> &mut GraphModel {
		&mut self.graph
	}

	/// Swaps in a new dataset. Temperature resets to 1 and every force
	/// re-initializes against the new graph.
	pub fn replace_graph(&mut self, graph: GraphModel) -> GraphModel {
		let old = std::mem::replace(&mut self.graph, graph);
		self.forces.initialize(&self.graph);
		self.ticks = 0;
		self.reheat();
		old
	}

	/// Registers (or replaces in place) a named force.
	pub fn add_force(&mut self, name: &str, mut force: impl Force + 'static) {
		force.initialize(&self.graph);
		self.forces.insert(name, Box::new(force));
	}

	/// Unregisters a force, returning it.
	pub fn remove_force(&mut self, name: &str) -> Option<Box<dyn Force>> {
		self.forces.remove(name)
	}

	/// Toggles a force without removing it. `false` if no force has that name.
	pub fn set_force_enabled(&mut self, name: &str, enabled: bool) -> bool {
		self.forces.set_enabled(name, enabled)
	}

	/// Typed access to a registered force.
	pub fn force<T: Force + 'static>(&self, name: &str) -> Option<&T> {
		self.forces.get(name)
	}

	/// Typed mutable access to a registered force.
	pub fn force_mut<T: Force + 'static>(&mut self, name: &str) -> Option<&mut T> {
		self.forces.get_mut(name)
	}

	/// All registered forces.
	pub fn forces(&self) -> &ForceRegistry {
		&self.forces
	}

	/// Sets the many-body strength and re-heats. Returns `false` (and leaves the
	/// layout alone) for a non-finite value or a missing `charge` force.
	pub fn set_charge_strength(&mut self, strength: f64) -> bool {
		if !strength.is_finite() {
			warn!("ignoring non-finite charge strength {strength}");
			return false;
		}
		let Some(charge) = self.forces.get_mut::<ManyBodyForce>(forces::CHARGE) else {
			return false;
		};
		charge.set_strength(strength);
		self.reheat();
		true
	}

	/// Sets the link strength and re-heats. Same contract as
	/// [`Simulation::set_charge_strength`].
	pub fn set_link_strength(&mut self, strength: f64) -> bool {
		if !strength.is_finite() {
			warn!("ignoring non-finite link strength {strength}");
			return false;
		}
		let Some(link) = self.forces.get_mut::<LinkForce>(forces::LINK) else {
			return false;
		};
		link.set_strength(strength);
		self.reheat();
		true
	}

	/// Moves the centering target, e.g. after the canvas is resized.
	pub fn set_center(&mut self, x: f64, y: f64) {
		if let Some(center) = self.forces.get_mut::<CenterForce>(forces::CENTER) {
			center.set_target(x, y);
			self.restart();
		}
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Sets the temperature directly.
	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	/// Temperature alpha decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Sets the temperature alpha decays toward.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Idle threshold.
	pub fn alpha_min(&self) -> f64 {
		self.alpha_min
	}

	/// Sets the idle threshold.
	pub fn set_alpha_min(&mut self, alpha_min: f64) {
		self.alpha_min = alpha_min;
	}

	/// Fraction of the gap to the target closed per tick.
	pub fn alpha_decay(&self) -> f64 {
		self.alpha_decay
	}

	/// Sets the per-tick alpha decay.
	pub fn set_alpha_decay(&mut self, decay: f64) {
		self.alpha_decay = decay;
	}

	/// Velocity multiplier applied each tick.
	pub fn velocity_decay(&self) -> f64 {
		self.velocity_decay
	}

	/// Sets the velocity multiplier.
	pub fn set_velocity_decay(&mut self, decay: f64) {
		self.velocity_decay = decay;
	}

	/// Running or idle.
	pub fn state(&self) -> RunState {
		self.state
	}

	/// Whether frames are currently no-ops.
	pub fn is_idle(&self) -> bool {
		self.state == RunState::Idle
	}

	/// Ticks performed since construction or the last graph swap.
	pub fn tick_count(&self) -> u64 {
		self.ticks
	}

	/// Listener invoked after every scheduled tick with the updated graph.
	pub fn on_tick(&mut self, listener: impl FnMut(&GraphModel) + 'static) {
		self.on_tick = Some(Box::new(listener));
	}

	/// Listener invoked once each time the loop cools down to idle.
	pub fn on_end(&mut self, listener: impl FnMut() + 'static) {
		self.on_end = Some(Box::new(listener));
	}

	/// Resumes ticking. Calling it while already running changes nothing.
	pub fn restart(&mut self) {
		if self.state == RunState::Idle {
			debug!("simulation restarted at alpha {:.4}", self.alpha);
		}
		self.state = RunState::Running;
	}

	/// Goes idle immediately without firing the end listener.
	pub fn stop(&mut self) {
		self.state = RunState::Idle;
	}

	/// Full temperature and restart, so the layout re-settles.
	pub fn reheat(&mut self) {
		self.alpha = 1.0;
		self.restart();
	}

	/// Advances one step without notifying listeners or changing run state.
	pub fn tick(&mut self) {
		self.forces
			.apply_all(&mut self.graph, self.alpha, &mut self.rng);

		let decay = self.velocity_decay;
		for node in self.graph.nodes_mut() {
			match node.pin {
				Some((fx, fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= decay;
					node.x += node.vx;
					node.vy *= decay;
					node.y += node.vy;
				}
			}
		}

		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		self.ticks += 1;
	}

	/// Scheduled step. Ticks once if running, notifies the tick listener and
	/// goes idle once cooled. Returns whether a tick happened.
	pub fn frame(&mut self) -> bool {
		if self.state == RunState::Idle {
			return false;
		}

		self.tick();
		if let Some(listener) = self.on_tick.as_mut() {
			listener(&self.graph);
		}

		if self.alpha < self.alpha_min && self.alpha_target < self.alpha_min {
			self.state = RunState::Idle;
			debug!("simulation idle after {} ticks", self.ticks);
			if let Some(listener) = self.on_end.as_mut() {
				listener();
			}
		}
		true
	}
}
