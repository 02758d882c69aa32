//! Visual theming for the collaboration graph.
//!
//! Colors for the canvas background, links, node outlines and the country
//! palette.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color at opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// The ten-color categorical palette, in order.
pub const CATEGORY10: [Color; 10] = [
	Color::rgb(0x1f, 0x77, 0xb4), // Blue
	Color::rgb(0xff, 0x7f, 0x0e), // Orange
	Color::rgb(0x2c, 0xa0, 0x2c), // Green
	Color::rgb(0xd6, 0x27, 0x28), // Red
	Color::rgb(0x94, 0x67, 0xbd), // Purple
	Color::rgb(0x8c, 0x56, 0x4b), // Brown
	Color::rgb(0xe3, 0x77, 0xc2), // Pink
	Color::rgb(0x7f, 0x7f, 0x7f), // Gray
	Color::rgb(0xbc, 0xbd, 0x22), // Olive
	Color::rgb(0x17, 0xbe, 0xcf), // Cyan
];

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill.
	pub background: Color,
	/// Link stroke.
	pub link: Color,
	/// Link stroke width in pixels.
	pub link_width: f64,
	/// Node outline.
	pub node_border: Color,
	/// Node outline width in pixels.
	pub node_border_width: f64,
	/// Colors assigned to the most common countries, in rank order.
	pub palette: [Color; 10],
	/// Fill for every country outside the palette.
	pub other_country: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			link: Color::rgb(0xaa, 0xaa, 0xaa),
			link_width: 1.5,
			node_border: Color::rgb(255, 255, 255),
			node_border_width: 1.5,
			palette: CATEGORY10,
			other_country: Color::rgb(0xa9, 0xa9, 0xa9), // DarkGray
		}
	}
}
