//! Layout failures.

/// Reasons a layout algorithm can refuse or fail to position nodes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
	/// No directed-graph engine is installed.
	#[error("directed graph layout capability is not available")]
	Unavailable,
	/// The hierarchical layout got a diagram without links.
	#[error("hierarchical layout needs at least one link")]
	NoEdges,
	/// A coordinate came out NaN or infinite.
	#[error("invalid position ({x}, {y}) computed for {node}")]
	InvalidPosition {
		/// Id of the affected node.
		node: String,
		/// Computed left edge.
		x: f64,
		/// Computed top edge.
		y: f64,
	},
	/// Any other failure inside an algorithm.
	#[error("layout computation failed: {0}")]
	Computation(String),
}

/// Result of a layout step.
pub type Result<T> = std::result::Result<T, LayoutError>;
