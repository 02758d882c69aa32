//! Dataset structures: the JSON document the layout is built from.

use serde::Deserialize;

use crate::error::DataLoadError;

/// A researcher in the collaboration network.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Institution name; drives hover highlighting.
	#[serde(default)]
	pub affiliation: String,
	/// Country of the affiliation; drives node colour.
	#[serde(default)]
	pub country: String,
	/// Number of shared publications. Drives draw radius and collision extent.
	#[serde(default)]
	pub shared_pubs: f64,
	/// Optional starting position. Unpositioned nodes are placed on a spiral.
	#[serde(default)]
	pub x: Option<f64>,
	/// Optional starting y; see `x`.
	#[serde(default)]
	pub y: Option<f64>,
}

/// An undirected collaboration between two researchers.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphData {
	/// Researchers, in draw order.
	pub nodes: Vec<GraphNode>,
	/// Collaborations between researchers, by id.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parses a dataset document.
	pub fn from_json(text: &str) -> Result<Self, DataLoadError> {
		Ok(serde_json::from_str(text)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_camel_case_dataset() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [
					{"id": "Ada", "affiliation": "MIT", "country": "USA", "sharedPubs": 4},
					{"id": "Bo", "affiliation": "ETH", "country": "Switzerland", "sharedPubs": 1.5, "x": 3, "y": 4}
				],
				"links": [{"source": "Ada", "target": "Bo"}]
			}"#,
		)
		.unwrap();

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].shared_pubs, 4.0);
		assert_eq!(data.nodes[0].x, None);
		assert_eq!(data.nodes[1].x, Some(3.0));
		assert_eq!(data.links[0].target, "Bo");
	}

	#[test]
	fn missing_attributes_default() {
		let data = GraphData::from_json(r#"{"nodes": [{"id": "solo"}]}"#).unwrap();
		assert_eq!(data.nodes[0].affiliation, "");
		assert_eq!(data.nodes[0].shared_pubs, 0.0);
		assert!(data.links.is_empty());
	}

	#[test]
	fn malformed_json_is_a_load_error() {
		let err = GraphData::from_json("{\"nodes\": [").unwrap_err();
		assert!(matches!(err, DataLoadError::Parse(_)));
	}
}
