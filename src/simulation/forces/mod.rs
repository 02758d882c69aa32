//! Force registry and the standard layout forces.
//!
//! Each force reads the current positions and velocities and accumulates
//! velocity deltas (or, for centering, position shifts). The registry applies
//! enabled forces in insertion order; replacing a force keeps its slot.

mod center;
mod collide;
mod link;
mod many_body;
mod quadtree;

use std::any::Any;
use std::fmt;

use rand::Rng;
use rand::rngs::SmallRng;

use super::model::GraphModel;

pub use center::CenterForce;
pub use collide::CollideForce;
pub use link::LinkForce;
pub use many_body::ManyBodyForce;

/// Registry name of the link force.
pub const LINK: &str = "link";
/// Registry name of the many-body force.
pub const CHARGE: &str = "charge";
/// Registry name of the centering force.
pub const CENTER: &str = "center";
/// Registry name of the collision force.
pub const COLLIDE: &str = "collide";

/// Type-erased access to a concrete force for runtime tuning.
pub trait AsAny {
	/// Borrow as [`Any`] for downcasting.
	fn as_any(&self) -> &dyn Any;
	/// Mutably borrow as [`Any`] for downcasting.
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// A layout force applied once per tick.
pub trait Force: AsAny + fmt::Debug {
	/// Called when the force is registered and whenever the graph is replaced.
	/// Forces cache per-node or per-link data here.
	fn initialize(&mut self, _graph: &GraphModel) {}

	/// Mutates velocities (or positions) for the current `alpha`.
	fn apply(&mut self, graph: &mut GraphModel, alpha: f64, rng: &mut SmallRng);
}

/// Tiny random offset used to give coincident points a direction.
pub(crate) fn jiggle(rng: &mut SmallRng) -> f64 {
	(rng.random::<f64>() - 0.5) * 1e-6
}

struct ForceEntry {
	name: String,
	enabled: bool,
	force: Box<dyn Force>,
}

/// Named forces in a caller-defined order.
#[derive(Default)]
pub struct ForceRegistry {
	entries: Vec<ForceEntry>,
}

impl fmt::Debug for ForceRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(
				self.entries
					.iter()
					.map(|entry| (&entry.name, entry.enabled, &entry.force)),
			)
			.finish()
	}
}

impl ForceRegistry {
	/// Adds a force under `name`, or replaces the one already there in place.
	/// Returns the replaced force.
	pub fn insert(
		&mut self,
		name: impl Into<String>,
		force: Box<dyn Force>,
	) -> Option<Box<dyn Force>> {
		let name = name.into();
		if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
			return Some(std::mem::replace(&mut entry.force, force));
		}
		self.entries.push(ForceEntry {
			name,
			enabled: true,
			force,
		});
		None
	}

	/// Removes a force, returning it if it was registered.
	pub fn remove(&mut self, name: &str) -> Option<Box<dyn Force>> {
		let position = self.entries.iter().position(|entry| entry.name == name)?;
		Some(self.entries.remove(position).force)
	}

	/// Enables or disables a force without removing it. Returns `false` when no
	/// force has that name.
	pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
		match self.entries.iter_mut().find(|entry| entry.name == name) {
			Some(entry) => {
				entry.enabled = enabled;
				true
			}
			None => false,
		}
	}

	/// Whether `name` is registered and enabled.
	pub fn is_enabled(&self, name: &str) -> bool {
		self.entries
			.iter()
			.any(|entry| entry.name == name && entry.enabled)
	}

	/// Typed access to a registered force; `None` on a missing name or
	/// a different type.
	pub fn get<T: Force + 'static>(&self, name: &str) -> Option<&T> {
		let entry = self.entries.iter().find(|entry| entry.name == name)?;
		(*entry.force).as_any().downcast_ref::<T>()
	}

	/// Mutable counterpart of [`ForceRegistry::get`].
	pub fn get_mut<T: Force + 'static>(&mut self, name: &str) -> Option<&mut T> {
		let entry = self.entries.iter_mut().find(|entry| entry.name == name)?;
		(*entry.force).as_any_mut().downcast_mut::<T>()
	}

	/// Names in application order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|entry| entry.name.as_str())
	}

	/// Number of registered forces, enabled or not.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether no force is registered.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Re-initializes every force, enabled or not, against `graph`.
	pub fn initialize(&mut self, graph: &GraphModel) {
		for entry in &mut self.entries {
			entry.force.initialize(graph);
		}
	}

	/// Applies the enabled forces in order.
	pub fn apply_all(&mut self, graph: &mut GraphModel, alpha: f64, rng: &mut SmallRng) {
		for entry in self.entries.iter_mut().filter(|entry| entry.enabled) {
			entry.force.apply(graph, alpha, rng);
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::*;
	use crate::simulation::fixtures;

	/// Folds its value into node 0's `vx` so application order is observable.
	#[derive(Debug)]
	struct Marker(f64);

	impl Force for Marker {
		fn apply(&mut self, graph: &mut GraphModel, _alpha: f64, _rng: &mut SmallRng) {
			let node = &mut graph.nodes_mut()[0];
			node.vx = node.vx * 10.0 + self.0;
		}
	}

	#[test]
	fn applies_enabled_forces_in_order() {
		let mut graph = fixtures::graph(&[("a", "", 0.0, 0.0, 0.0)], &[]);
		let mut rng = SmallRng::seed_from_u64(1);
		let mut registry = ForceRegistry::default();
		registry.insert("one", Box::new(Marker(1.0)));
		registry.insert("two", Box::new(Marker(2.0)));
		registry.insert("three", Box::new(Marker(3.0)));
		assert!(registry.set_enabled("two", false));

		registry.apply_all(&mut graph, 1.0, &mut rng);
		assert_eq!(graph.nodes()[0].vx, 13.0);
		assert!(!registry.is_enabled("two"));
		assert!(!registry.set_enabled("missing", true));
	}

	#[test]
	fn replacing_keeps_the_slot() {
		let mut registry = ForceRegistry::default();
		registry.insert("one", Box::new(Marker(1.0)));
		registry.insert("two", Box::new(Marker(2.0)));
		let old = registry.insert("one", Box::new(Marker(9.0)));

		assert!(old.is_some());
		assert_eq!(registry.names().collect::<Vec<_>>(), vec!["one", "two"]);
		assert_eq!(registry.get::<Marker>("one").map(|m| m.0), Some(9.0));
	}

	#[test]
	fn typed_access_checks_the_concrete_type() {
		let mut registry = ForceRegistry::default();
		registry.insert(CHARGE, Box::new(ManyBodyForce::new(-30.0)));

		assert!(registry.get::<LinkForce>(CHARGE).is_none());
		registry
			.get_mut::<ManyBodyForce>(CHARGE)
			.unwrap()
			.set_strength(-90.0);
		assert_eq!(registry.get::<ManyBodyForce>(CHARGE).unwrap().strength(), -90.0);

		assert!(registry.remove(CHARGE).is_some());
		assert!(registry.is_empty());
		assert!(registry.remove(CHARGE).is_none());
	}
}
