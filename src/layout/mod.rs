//! Headless graph layout for entity-relationship diagrams.
//!
//! Every algorithm works on plain [`Node`]/[`Edge`] slices and a [`Canvas`], so
//! the whole module runs without a browser. [`LayoutManager`] is the single
//! entry point: it picks an algorithm by name, falls back to the grid on any
//! failure and refreshes link routes afterwards.

pub mod circular;
pub mod error;
pub mod force;
pub mod fruchterman;
pub mod geometry;
pub mod grid;
pub mod hierarchical;
pub mod layered;
pub mod manager;
pub mod radial;
pub mod routing;
pub mod types;

pub use error::{LayoutError, Result};
pub use hierarchical::{DirectedGraphLayout, RankDirection, RankGraph, RankOptions, Unavailable};
pub use layered::LayeredLayout;
pub use manager::{LayoutKind, LayoutManager, LayoutReport};
pub use types::{
	Canvas, Connector, Edge, EdgeStyle, LevelGuide, Node, NodeStyle, Point, Router,
};

/// Moves each node to its target top-left position. Non-finite targets are
/// skipped and the node keeps its prior position; the first such error is
/// returned so callers that must not skip can escalate it.
pub(crate) fn apply_positions(nodes: &mut [Node], targets: &[Point]) -> Option<LayoutError> {
	let mut first = None;
	for (node, target) in nodes.iter_mut().zip(targets) {
		if !target.is_finite() {
			let err = LayoutError::InvalidPosition {
				node: node.id.clone(),
				x: target.x,
				y: target.y,
			};
			log::error!("{err}");
			first.get_or_insert(err);
			continue;
		}
		node.x = target.x;
		node.y = target.y;
	}
	first
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn non_finite_targets_leave_nodes_in_place() {
		let mut nodes = vec![Node::entity("a"), Node::entity("b")];
		nodes[1].x = 7.0;
		nodes[1].y = 8.0;
		let err = apply_positions(&mut nodes, &[Point::new(1.0, 2.0), Point::new(f64::NAN, 3.0)]);
		assert!(matches!(err, Some(LayoutError::InvalidPosition { ref node, .. }) if node == "b"));
		assert_eq!(nodes[0].position(), Point::new(1.0, 2.0));
		assert_eq!(nodes[1].position(), Point::new(7.0, 8.0));
	}
}
