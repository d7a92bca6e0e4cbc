//! Diagram data model shared by every layout algorithm.

use std::collections::HashMap;

/// Default entity border color.
pub const DEFAULT_STROKE: &str = "#333333";
/// Default link color.
pub const DEFAULT_LINK_STROKE: &str = "#333333";

/// Narrowest entity box.
pub const MIN_NODE_WIDTH: f64 = 160.0;
/// Widest entity box; longer names are cut off.
pub const MAX_NODE_WIDTH: f64 = 300.0;
/// Height of every entity box.
pub const NODE_HEIGHT: f64 = 50.0;

/// A 2D point in diagram space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate, growing rightwards.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Creates a point.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// True when neither coordinate is NaN or infinite.
	pub fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// Drawing surface dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl Canvas {
	/// Creates a canvas of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Middle of the surface.
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

/// Border of an entity box.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// CSS color of the border.
	pub stroke: String,
	/// Border width in pixels.
	pub stroke_width: f64,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			stroke: DEFAULT_STROKE.into(),
			stroke_width: 2.0,
		}
	}
}

/// One database table on the diagram. `x`/`y` is the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Table name; unique within a diagram.
	pub id: String,
	/// Text drawn inside the box.
	pub label: String,
	/// Box width.
	pub width: f64,
	/// Box height.
	pub height: f64,
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Border style.
	pub style: NodeStyle,
}

impl Node {
	/// Creates a table entity sized from its name.
	pub fn entity(name: &str) -> Self {
		let text_width = name.chars().count() as f64 * 10.0;
		let width = (text_width + 40.0).clamp(MIN_NODE_WIDTH, MAX_NODE_WIDTH);
		Self::with_size(name, width, NODE_HEIGHT)
	}

	/// Creates an entity with an explicit box size at the origin.
	pub fn with_size(name: &str, width: f64, height: f64) -> Self {
		Self {
			id: name.to_string(),
			label: name.to_string(),
			width,
			height,
			x: 0.0,
			y: 0.0,
			style: NodeStyle::default(),
		}
	}

	/// Top-left corner.
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	/// Middle of the box.
	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// True when `p` lies inside the box, borders included.
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}
}

/// How a link's path is computed from its endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Router {
	/// Straight segment between the two entity borders.
	Normal,
	/// Orthogonal segments with a single elbow pair.
	#[default]
	Manhattan,
}

/// How route corners are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Connector {
	/// Corners are arcs of `radius`.
	Rounded {
		/// Corner arc radius.
		radius: f64,
	},
}

impl Default for Connector {
	fn default() -> Self {
		Connector::Rounded { radius: 10.0 }
	}
}

/// Stroke and routing of a link.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	/// CSS color of the line and arrowhead.
	pub stroke: String,
	/// Line width in pixels.
	pub stroke_width: f64,
	/// Drawn with a dash pattern.
	pub dashed: bool,
	/// Path shape.
	pub router: Router,
	/// Corner shape.
	pub connector: Connector,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			stroke: DEFAULT_LINK_STROKE.into(),
			stroke_width: 2.0,
			dashed: false,
			router: Router::Manhattan,
			connector: Connector::default(),
		}
	}
}

/// One field-to-field relationship between two tables.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Id of the referencing table.
	pub source: String,
	/// Id of the referenced table.
	pub target: String,
	/// Field name shown near the source end.
	pub source_label: String,
	/// Field name shown near the target end.
	pub target_label: String,
	/// Stroke and routing.
	pub style: EdgeStyle,
	/// Derived waypoints; rebuilt by [`super::routing::refresh_routes`].
	pub route: Vec<Point>,
}

impl Edge {
	/// Unlabeled link with the default style.
	pub fn new(source: &str, target: &str) -> Self {
		Self::with_labels(source, target, "", "")
	}

	/// Link carrying the field names of both ends.
	pub fn with_labels(source: &str, target: &str, source_label: &str, target_label: &str) -> Self {
		Self {
			source: source.to_string(),
			target: target.to_string(),
			source_label: source_label.to_string(),
			target_label: target_label.to_string(),
			style: EdgeStyle::default(),
			route: Vec::new(),
		}
	}
}

/// A dashed circle drawn behind entities to show a radial level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelGuide {
	/// Circle center.
	pub center: Point,
	/// Circle radius.
	pub radius: f64,
	/// CSS color of the circle.
	pub stroke: String,
	/// Dash and gap lengths.
	pub dash: (f64, f64),
}

/// Maps node ids to slice indices, keeping the first occurrence of an id.
pub fn index_nodes(nodes: &[Node]) -> HashMap<&str, usize> {
	let mut index = HashMap::with_capacity(nodes.len());
	for (i, node) in nodes.iter().enumerate() {
		index.entry(node.id.as_str()).or_insert(i);
	}
	index
}

/// Resolves every edge to `(source, target)` indices, skipping edges whose
/// endpoints are not present in `nodes`.
pub fn resolve_edges(nodes: &[Node], edges: &[Edge]) -> Vec<(usize, usize)> {
	let index = index_nodes(nodes);
	edges
		.iter()
		.filter_map(|edge| {
			match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
				(Some(&s), Some(&t)) => Some((s, t)),
				_ => {
					log::debug!(
						"skipping link {} -> {} with a missing endpoint",
						edge.source,
						edge.target
					);
					None
				}
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn entity_width_is_clamped() {
		assert_eq!(Node::entity("users").width, MIN_NODE_WIDTH);
		assert_eq!(Node::entity(&"x".repeat(40)).width, MAX_NODE_WIDTH);
		assert_eq!(Node::entity(&"x".repeat(15)).width, 190.0);
		assert_eq!(Node::entity("users").height, NODE_HEIGHT);
	}

	#[test]
	fn resolve_edges_skips_missing_endpoints() {
		let nodes = vec![Node::entity("a"), Node::entity("b")];
		let edges = vec![Edge::new("a", "b"), Edge::new("a", "ghost"), Edge::new("b", "b")];
		assert_eq!(resolve_edges(&nodes, &edges), vec![(0, 1), (1, 1)]);
	}
}
