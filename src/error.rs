//! Error types for dataset loading and graph construction.

/// Failure to read or parse the input dataset (or configuration).
///
/// A load failure is terminal for the session: the layout is never built and
/// no retry is attempted.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
	/// The document has no element with this id.
	#[error("no data element with id `{0}` in the document")]
	MissingSource(String),
	/// The element's text is not valid JSON for the expected shape.
	#[error("failed to parse graph data: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Structural problems in the graph itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
	/// A link endpoint names a node that does not exist.
	#[error("link {link} references unknown node `{id}`")]
	DanglingReference {
		/// Position of the link in the dataset.
		link: usize,
		/// The unresolved endpoint id.
		id: String,
	},
	/// Lookup by an id that is not in the graph.
	#[error("node `{id}` not found")]
	NotFound {
		/// The requested id.
		id: String,
	},
	/// Two nodes share an id.
	#[error("node id `{id}` appears more than once")]
	DuplicateId {
		/// The repeated id.
		id: String,
	},
}

/// Result of graph operations.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;
