//! Data-to-visual scales.
//!
//! Node draw radius comes from shared publications through a square-root
//! scale; node fill comes from country through an ordinal scale over the ten
//! most common countries in the dataset.

use super::theme::{Color, Theme};
use crate::simulation::Node;

/// Countries with a dedicated palette entry, in palette order.
pub const TOP_COUNTRIES: [&str; 10] = [
	"USA",
	"India",
	"Germany",
	"France",
	"UK",
	"China",
	"Japan",
	"Canada",
	"Italy",
	"Australia",
];

/// Maps `sqrt(value)` linearly from the square-rooted domain onto the range.
///
/// Values outside the domain extrapolate; the result never drops below zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl SqrtScale {
	/// Scale from `domain` onto `range`.
	pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	/// Scaled value.
	pub fn apply(&self, value: f64) -> f64 {
		let (d0, d1) = (self.domain.0.sqrt(), self.domain.1.sqrt());
		let (r0, r1) = self.range;
		if d0 == d1 {
			return r0;
		}
		let t = (value.max(0.0).sqrt() - d0) / (d1 - d0);
		(r0 + t * (r1 - r0)).max(0.0)
	}
}

/// Shared publications in `[1, 20]` drawn as radii in `[3, 12]` pixels.
pub const NODE_RADIUS: SqrtScale = SqrtScale::new((1.0, 20.0), (3.0, 12.0));

/// Draw (and hit-test) radius of a node.
pub fn node_radius(node: &Node) -> f64 {
	NODE_RADIUS.apply(node.shared_pubs)
}

/// Palette entry for a top country, `other_country` for the rest.
pub fn country_color(theme: &Theme, country: &str) -> Color {
	TOP_COUNTRIES
		.iter()
		.position(|&top| top == country)
		.and_then(|rank| theme.palette.get(rank))
		.copied()
		.unwrap_or(theme.other_country)
}
