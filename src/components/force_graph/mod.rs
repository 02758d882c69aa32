//! Collaboration graph visualization component.
//!
//! Renders the force-directed layout on an HTML canvas with:
//! - Node fill by country and radius by shared publications
//! - Node dragging that keeps the layout warm while held
//! - Affiliation highlight on hover and a detail tooltip on click
//! - Sliders for charge and link strength
//!
//! # Example
//!
//! ```ignore
//! use collab_graph::{ForceGraphCanvas, GraphData};
//!
//! let data = GraphData::from_json(r#"{
//!     "nodes": [{"id": "a", "country": "USA"}, {"id": "b", "country": "UK"}],
//!     "links": [{"source": "a", "target": "b"}]
//! }"#)?;
//!
//! view! { <ForceGraphCanvas data=data fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::ForceGraphCanvas;
pub use state::ForceGraphState;
pub use theme::Theme;
