//! Simulation configuration.
//!
//! Defaults reproduce the collaboration-network layout: link strength 0.5,
//! charge -200, centering on the canvas middle and collision radii derived from
//! shared publications. Any subset of fields can be overridden from JSON; missing
//! fields keep their defaults.

use serde::Deserialize;

use crate::error::DataLoadError;

/// Alpha target held while at least one node is being dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Top-level simulation parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
	/// The loop goes idle once alpha and its target are both below this.
	pub alpha_min: f64,
	/// Fraction of the gap to the alpha target closed per tick.
	pub alpha_decay: f64,
	/// Multiplier applied to every velocity once per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
	/// Seed for the jiggle random source.
	pub seed: u64,
	/// Link force parameters.
	pub link: LinkConfig,
	/// Many-body force parameters.
	pub charge: ChargeConfig,
	/// Centering force parameters.
	pub center: CenterConfig,
	/// Collision force parameters.
	pub collide: CollideConfig,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			alpha_min: 0.001,
			alpha_decay: 0.0228,
			velocity_decay: 0.6,
			drag_alpha_target: DRAG_ALPHA_TARGET,
			seed: 0x5eed,
			link: LinkConfig::default(),
			charge: ChargeConfig::default(),
			center: CenterConfig::default(),
			collide: CollideConfig::default(),
		}
	}
}

impl SimulationConfig {
	/// Parses a partial configuration; absent fields keep their defaults.
	pub fn from_json(text: &str) -> Result<Self, DataLoadError> {
		Ok(serde_json::from_str(text)?)
	}
}

/// Spring parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkConfig {
	/// Spring stiffness, `0..=1`.
	pub strength: f64,
	/// Base rest length of a link.
	pub distance: f64,
	/// Add both endpoints' collision radii to the rest length. Set to `false`
	/// for the classic layout with a plain 30px rest length.
	pub pad_with_radii: bool,
	/// Relaxation passes per tick.
	pub iterations: usize,
}

impl Default for LinkConfig {
	fn default() -> Self {
		Self {
			strength: 0.5,
			distance: 30.0,
			pad_with_radii: true,
			iterations: 1,
		}
	}
}

/// Many-body parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ChargeConfig {
	/// Negative repels, positive attracts.
	pub strength: f64,
	/// Barnes-Hut opening threshold.
	pub theta: f64,
	/// Lower clamp on pair distance.
	pub distance_min: f64,
	/// Pairs farther apart do not interact; `None` is unbounded.
	pub distance_max: Option<f64>,
	/// Largest node count still handled by the exact pairwise pass.
	pub direct_limit: usize,
}

impl Default for ChargeConfig {
	fn default() -> Self {
		Self {
			strength: -200.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: None,
			direct_limit: 200,
		}
	}
}

/// Centering parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CenterConfig {
	/// Fraction of the centroid offset removed per tick.
	pub strength: f64,
}

impl Default for CenterConfig {
	fn default() -> Self {
		Self { strength: 1.0 }
	}
}

/// Collision parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CollideConfig {
	/// Fraction of each overlap resolved per pass, before alpha scaling.
	pub strength: f64,
	/// Relaxation passes per tick.
	pub iterations: usize,
}

impl Default for CollideConfig {
	fn default() -> Self {
		Self {
			strength: 1.0,
			iterations: 1,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config =
			SimulationConfig::from_json(r#"{"charge": {"strength": -450}, "alphaDecay": 0.05}"#)
				.unwrap();
		assert_eq!(config.charge.strength, -450.0);
		assert_eq!(config.charge.theta, 0.9);
		assert_eq!(config.alpha_decay, 0.05);
		assert_eq!(config.link, LinkConfig::default());
	}

	#[test]
	fn empty_object_is_default() {
		assert_eq!(
			SimulationConfig::from_json("{}").unwrap(),
			SimulationConfig::default()
		);
	}
}
