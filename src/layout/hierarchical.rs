//! Rank-based layout delegated to a pluggable directed-graph engine.

use super::types::{Canvas, Edge, Node, Point, resolve_edges};
use super::{LayoutError, Result, apply_positions};

/// Axis along which ranks advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankDirection {
	/// Ranks are columns.
	#[default]
	LeftRight,
	/// Ranks are rows.
	TopBottom,
}

/// Spacing handed to the directed-graph engine.
#[derive(Clone, Debug, PartialEq)]
pub struct RankOptions {
	/// Rank axis.
	pub rank_dir: RankDirection,
	/// Left and right margin.
	pub margin_x: f64,
	/// Top and bottom margin.
	pub margin_y: f64,
	/// Gap between nodes sharing a rank.
	pub node_sep: f64,
	/// Gap reserved between parallel links.
	pub edge_sep: f64,
	/// Gap between consecutive ranks.
	pub rank_sep: f64,
}

impl RankOptions {
	/// Margins and separations proportional to the canvas.
	pub fn for_canvas(canvas: Canvas) -> Self {
		Self {
			rank_dir: RankDirection::LeftRight,
			margin_x: canvas.width * 0.1,
			margin_y: canvas.height * 0.1,
			node_sep: (canvas.width * 0.1).max(80.0),
			edge_sep: (canvas.width * 0.05).max(80.0),
			rank_sep: (canvas.height * 0.1).max(150.0),
		}
	}
}

/// Nodes plus links resolved to node indices.
pub struct RankGraph<'a> {
	/// Nodes to place.
	pub nodes: &'a [Node],
	/// `(source, target)` indices into `nodes`.
	pub links: Vec<(usize, usize)>,
}

/// A directed-graph layout engine. Returns one top-left position per node.
pub trait DirectedGraphLayout {
	/// Places every node of `graph`.
	fn layout(&self, graph: &RankGraph<'_>, options: &RankOptions) -> Result<Vec<Point>>;
}

/// Engine stand-in for environments without a directed-graph layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unavailable;

impl DirectedGraphLayout for Unavailable {
	fn layout(&self, _: &RankGraph<'_>, _: &RankOptions) -> Result<Vec<Point>> {
		Err(LayoutError::Unavailable)
	}
}

/// Lays out the diagram with `engine`. Fails without links, or when the
/// engine is missing or misbehaves.
pub fn arrange(
	nodes: &mut [Node],
	edges: &[Edge],
	canvas: Canvas,
	engine: &dyn DirectedGraphLayout,
) -> Result<()> {
	let links = resolve_edges(nodes, edges);
	if links.is_empty() {
		return Err(LayoutError::NoEdges);
	}
	let options = RankOptions::for_canvas(canvas);
	let targets = engine.layout(
		&RankGraph {
			nodes: &*nodes,
			links,
		},
		&options,
	)?;
	if targets.len() != nodes.len() {
		return Err(LayoutError::Computation(format!(
			"engine returned {} positions for {} nodes",
			targets.len(),
			nodes.len()
		)));
	}
	apply_positions(nodes, &targets);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Diagonal;

	impl DirectedGraphLayout for Diagonal {
		fn layout(&self, graph: &RankGraph<'_>, options: &RankOptions) -> Result<Vec<Point>> {
			Ok((0..graph.nodes.len())
				.map(|i| Point::new(options.margin_x + i as f64 * 10.0, options.margin_y))
				.collect())
		}
	}

	struct Short;

	impl DirectedGraphLayout for Short {
		fn layout(&self, _: &RankGraph<'_>, _: &RankOptions) -> Result<Vec<Point>> {
			Ok(vec![Point::default()])
		}
	}

	fn pair() -> (Vec<Node>, Vec<Edge>) {
		(
			vec![Node::entity("orders"), Node::entity("users")],
			vec![Edge::new("orders", "users")],
		)
	}

	#[test]
	fn options_scale_with_canvas() {
		let o = RankOptions::for_canvas(Canvas::new(2000.0, 1000.0));
		assert_eq!(o.rank_dir, RankDirection::LeftRight);
		assert_eq!((o.margin_x, o.margin_y), (200.0, 100.0));
		assert_eq!((o.node_sep, o.edge_sep, o.rank_sep), (200.0, 100.0, 150.0));
	}

	#[test]
	fn missing_engine_and_missing_links_are_distinct() {
		let (mut nodes, edges) = pair();
		let canvas = Canvas::new(800.0, 600.0);
		assert_eq!(arrange(&mut nodes, &edges, canvas, &Unavailable), Err(LayoutError::Unavailable));
		assert_eq!(arrange(&mut nodes, &[], canvas, &Diagonal), Err(LayoutError::NoEdges));
	}

	#[test]
	fn engine_positions_are_applied() {
		let (mut nodes, edges) = pair();
		arrange(&mut nodes, &edges, Canvas::new(800.0, 600.0), &Diagonal).unwrap();
		assert_eq!(nodes[1].position(), Point::new(90.0, 60.0));
	}

	#[test]
	fn short_engine_output_is_rejected() {
		let (mut nodes, edges) = pair();
		let err = arrange(&mut nodes, &edges, Canvas::new(800.0, 600.0), &Short).unwrap_err();
		assert!(matches!(err, LayoutError::Computation(_)));
	}
}
